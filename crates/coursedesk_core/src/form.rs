//! Course create/edit form state machine.
//!
//! `Editing → Validating → Submitting → Closed` on success. Validation and
//! service failures both return to `Editing` with the entered values kept;
//! a service failure also sets `submit_failed` until the next edit or
//! submit. While `Submitting`, field edits and further submits are rejected.
//!
//! The submit flow is split into `begin_submit` / `complete_submit` so a
//! shell can run the store call elsewhere; `submit` chains both.

use crate::model::course::{business_id_taken, fields, Course, CourseDraft};
use crate::model::record::RecordId;
use crate::model::schema::Entity;
use crate::model::validation::FieldErrors;
use crate::notify::{Notice, Notifier};
use crate::service::courses::CourseService;
use crate::service::{ServiceError, ServiceResult};
use crate::store::RecordStore;
use crate::view::CourseListView;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub const DEFAULT_DEPARTMENT: &str = "Computer Science";
pub const DEFAULT_TERM: &str = "Fall 2023";
pub const DEFAULT_CREDITS: &str = "3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Editing,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the stored course with this record id.
    Edit(RecordId),
}

/// Editable course form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    Id,
    Name,
    Department,
    Credits,
    Term,
    Instructor,
    Tags,
}

impl CourseField {
    /// Key used in `FieldErrors`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => fields::ID,
            Self::Name => fields::NAME,
            Self::Department => fields::DEPARTMENT,
            Self::Credits => fields::CREDITS,
            Self::Term => fields::TERM,
            Self::Instructor => fields::INSTRUCTOR,
            Self::Tags => "tags",
        }
    }
}

/// Raw text values as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFormValues {
    pub id: String,
    pub name: String,
    pub department: String,
    pub credits: String,
    pub term: String,
    pub instructor: String,
    pub tags: String,
}

impl Default for CourseFormValues {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            department: DEFAULT_DEPARTMENT.to_string(),
            credits: DEFAULT_CREDITS.to_string(),
            term: DEFAULT_TERM.to_string(),
            instructor: String::new(),
            tags: String::new(),
        }
    }
}

impl From<&Course> for CourseFormValues {
    fn from(course: &Course) -> Self {
        Self {
            id: course.course_id.clone(),
            name: course.name.clone(),
            department: course.department.clone(),
            credits: course.credits.to_string(),
            term: course.term.clone(),
            instructor: course.instructor.clone(),
            tags: course.tags.clone(),
        }
    }
}

/// Form operation failures.
#[derive(Debug)]
pub enum FormError {
    /// The form is not open.
    Closed,
    /// A submission is in flight; inputs are disabled.
    Busy,
    /// Field cannot change in the current mode.
    ReadOnly(CourseField),
    /// Local validation failed; see `CourseForm::errors`.
    Invalid(FieldErrors),
    /// Store accepted the write but returned no record.
    NoResult,
    Service(ServiceError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "course form is not open"),
            Self::Busy => write!(f, "course form is submitting"),
            Self::ReadOnly(field) => write!(f, "field `{}` is read-only", field.key()),
            Self::Invalid(errors) => write!(f, "{errors}"),
            Self::NoResult => write!(f, "store returned no course"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

/// Validated submission waiting for its store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub mode: FormMode,
    pub draft: CourseDraft,
}

pub struct CourseForm {
    state: FormState,
    mode: FormMode,
    values: CourseFormValues,
    errors: FieldErrors,
    submit_failed: bool,
    notifier: Arc<dyn Notifier>,
}

impl CourseForm {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: FormState::Closed,
            mode: FormMode::Create,
            values: CourseFormValues::default(),
            errors: FieldErrors::new(),
            submit_failed: false,
            notifier,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn values(&self) -> &CourseFormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the last store call failed; cleared by the next edit or submit.
    pub fn submit_failed(&self) -> bool {
        self.submit_failed
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    /// Inputs and the submit control are disabled while submitting.
    pub fn inputs_disabled(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// Opens a blank create form with default department, credits and term.
    pub fn open_new(&mut self) {
        self.reset();
        self.state = FormState::Editing;
    }

    /// Opens the form pre-filled from an existing course.
    pub fn open_edit(&mut self, course: &Course) {
        self.reset();
        self.values = CourseFormValues::from(course);
        self.mode = FormMode::Edit(course.id);
        self.state = FormState::Editing;
    }

    /// Closes the form and discards entered values.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::Busy);
        }
        self.reset();
        Ok(())
    }

    /// Updates one input and clears its error.
    pub fn set_field(
        &mut self,
        field: CourseField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        match self.state {
            FormState::Closed => return Err(FormError::Closed),
            FormState::Submitting | FormState::Validating => return Err(FormError::Busy),
            FormState::Editing => {}
        }
        if field == CourseField::Id && matches!(self.mode, FormMode::Edit(_)) {
            return Err(FormError::ReadOnly(field));
        }

        let value = value.into();
        let slot = match field {
            CourseField::Id => &mut self.values.id,
            CourseField::Name => &mut self.values.name,
            CourseField::Department => &mut self.values.department,
            CourseField::Credits => &mut self.values.credits,
            CourseField::Term => &mut self.values.term,
            CourseField::Instructor => &mut self.values.instructor,
            CourseField::Tags => &mut self.values.tags,
        };
        *slot = value;
        self.errors.clear_field(field.key());
        self.submit_failed = false;
        Ok(())
    }

    /// Checks required fields, credit range and (on create) id uniqueness.
    pub fn validate(&self, existing: &[Course]) -> Result<CourseDraft, FieldErrors> {
        let draft = CourseDraft {
            course_id: self.values.id.trim().to_string(),
            name: self.values.name.trim().to_string(),
            department: self.values.department.trim().to_string(),
            // Non-numeric input falls outside the credit range.
            credits: self.values.credits.trim().parse().unwrap_or(0),
            term: self.values.term.trim().to_string(),
            instructor: self.values.instructor.trim().to_string(),
            tags: self.values.tags.clone(),
        };

        let mut errors = Course::validate(&draft).err().unwrap_or_default();
        if self.mode == FormMode::Create && business_id_taken(existing, &draft.course_id) {
            errors.add(fields::ID, "Course ID already exists");
        }
        errors.into_result().map(|()| draft)
    }

    /// Validates and enters `Submitting` on success.
    ///
    /// On failure the form stays in `Editing`, per-field errors are set and
    /// one notice is pushed.
    pub fn begin_submit(&mut self, existing: &[Course]) -> Result<PendingSubmit, FormError> {
        match self.state {
            FormState::Closed => return Err(FormError::Closed),
            FormState::Submitting | FormState::Validating => return Err(FormError::Busy),
            FormState::Editing => {}
        }

        self.submit_failed = false;
        self.state = FormState::Validating;
        match self.validate(existing) {
            Ok(draft) => {
                self.errors = FieldErrors::new();
                self.state = FormState::Submitting;
                Ok(PendingSubmit {
                    mode: self.mode,
                    draft,
                })
            }
            Err(errors) => {
                debug!(
                    "event=course_form_submit module=form status=invalid fields={}",
                    errors.len()
                );
                self.errors = errors.clone();
                self.state = FormState::Editing;
                self.notifier
                    .notify(Notice::error("Please correct the errors in the form"));
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Applies the store outcome of a pending submission.
    ///
    /// Success merges the course into `list`, closes and resets the form.
    /// Failure returns to `Editing` with the entered values intact.
    pub fn complete_submit(
        &mut self,
        outcome: ServiceResult<Option<Course>>,
        list: &mut CourseListView,
    ) -> Result<Course, FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::Closed);
        }

        match outcome {
            Ok(Some(course)) => {
                let verb = match self.mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                list.upsert(course.clone());
                self.reset();
                self.notifier.notify(Notice::success(format!(
                    "Course {} has been {verb}",
                    course.course_id
                )));
                Ok(course)
            }
            Ok(None) => {
                self.state = FormState::Editing;
                self.submit_failed = true;
                self.notifier.notify(Notice::error("Failed to save course"));
                Err(FormError::NoResult)
            }
            Err(ServiceError::Validation(errors)) => {
                self.errors = errors.clone();
                self.state = FormState::Editing;
                self.notifier
                    .notify(Notice::error("Please correct the errors in the form"));
                Err(FormError::Invalid(errors))
            }
            Err(err) => {
                // The service already notified the user.
                self.state = FormState::Editing;
                self.submit_failed = true;
                Err(FormError::Service(err))
            }
        }
    }

    /// Validates against `list`, writes through `service`, and merges the
    /// result back into `list`.
    pub fn submit<S: RecordStore>(
        &mut self,
        service: &CourseService<S>,
        list: &mut CourseListView,
    ) -> Result<Course, FormError> {
        let pending = self.begin_submit(list.courses())?;
        let outcome = match pending.mode {
            FormMode::Create => service.create(&pending.draft),
            FormMode::Edit(id) => service.update(id, &pending.draft),
        };
        self.complete_submit(outcome, list)
    }

    fn reset(&mut self) {
        self.state = FormState::Closed;
        self.mode = FormMode::Create;
        self.values = CourseFormValues::default();
        self.errors = FieldErrors::new();
        self.submit_failed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{CourseField, CourseForm, FormError, FormState};
    use crate::model::course::Course;
    use crate::notify::{NoticeQueue, Notifier};
    use std::sync::Arc;

    fn existing() -> Vec<Course> {
        vec![Course {
            id: 1,
            course_id: "CS101".to_string(),
            name: "Intro".to_string(),
            department: "Computer Science".to_string(),
            credits: 3,
            term: "Fall 2023".to_string(),
            instructor: "Dr. Turing".to_string(),
            tags: String::new(),
        }]
    }

    fn filled_form(queue: &Arc<NoticeQueue>, id: &str) -> CourseForm {
        let notifier: Arc<dyn Notifier> = queue.clone();
        let mut form = CourseForm::new(notifier);
        form.open_new();
        form.set_field(CourseField::Id, id).unwrap();
        form.set_field(CourseField::Name, "Test").unwrap();
        form.set_field(CourseField::Instructor, "Dr. X").unwrap();
        form
    }

    #[test]
    fn duplicate_id_fails_on_create_with_single_notice() {
        let queue = Arc::new(NoticeQueue::new());
        let mut form = filled_form(&queue, "CS101");

        let err = form.begin_submit(&existing()).unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        assert_eq!(form.errors().get("id"), Some("Course ID already exists"));
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(queue.drain().len(), 1);
    }

    #[test]
    fn same_id_is_accepted_while_editing_that_course() {
        let queue = Arc::new(NoticeQueue::new());
        let notifier: Arc<dyn Notifier> = queue.clone();
        let courses = existing();
        let mut form = CourseForm::new(notifier);
        form.open_edit(&courses[0]);

        let pending = form.begin_submit(&courses).unwrap();
        assert_eq!(pending.draft.course_id, "CS101");
        assert!(form.inputs_disabled());
    }

    #[test]
    fn non_numeric_credits_are_a_credit_error() {
        let queue = Arc::new(NoticeQueue::new());
        let mut form = filled_form(&queue, "CS200");
        form.set_field(CourseField::Credits, "lots").unwrap();

        let errors = form.validate(&[]).unwrap_err();
        assert_eq!(errors.get("credits"), Some("Credits must be between 1 and 6"));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let queue = Arc::new(NoticeQueue::new());
        let mut form = filled_form(&queue, "");
        form.begin_submit(&[]).unwrap_err();
        assert!(form.errors().contains("id"));

        form.set_field(CourseField::Id, "CS300").unwrap();
        assert!(!form.errors().contains("id"));
    }

    #[test]
    fn inputs_are_rejected_while_submitting() {
        let queue = Arc::new(NoticeQueue::new());
        let mut form = filled_form(&queue, "CS400");
        form.begin_submit(&[]).unwrap();

        assert!(matches!(
            form.set_field(CourseField::Name, "changed"),
            Err(FormError::Busy)
        ));
        assert!(matches!(form.begin_submit(&[]), Err(FormError::Busy)));
    }

    #[test]
    fn business_id_is_read_only_in_edit_mode() {
        let queue = Arc::new(NoticeQueue::new());
        let notifier: Arc<dyn Notifier> = queue.clone();
        let mut form = CourseForm::new(notifier);
        form.open_edit(&existing()[0]);
        assert!(matches!(
            form.set_field(CourseField::Id, "CS999"),
            Err(FormError::ReadOnly(CourseField::Id))
        ));
    }
}
