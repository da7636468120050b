//! Course entity.
//!
//! # Invariants
//! - `course_id` (business id) is immutable after creation.
//! - `credits` stays within `MIN_CREDITS..=MAX_CREDITS`.

use crate::filter::CourseFilter;
use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::Entity;
use crate::model::validation::{require, FieldErrors};
use crate::store::query::SortDirection;

pub const MIN_CREDITS: i64 = 1;
pub const MAX_CREDITS: i64 = 6;

pub const COURSE_FIELD_NAME: &str = "Name";
pub const COURSE_FIELD_BUSINESS_ID: &str = "course_id";
pub const COURSE_FIELD_DEPARTMENT: &str = "department";
pub const COURSE_FIELD_CREDITS: &str = "credits";
pub const COURSE_FIELD_TERM: &str = "term";
pub const COURSE_FIELD_INSTRUCTOR: &str = "instructor";
pub const FIELD_TAGS: &str = "Tags";

/// Course as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: RecordId,
    /// Human-facing business key, e.g. `CS101`.
    pub course_id: String,
    pub name: String,
    pub department: String,
    pub credits: i64,
    pub term: String,
    pub instructor: String,
    /// Comma-separated free-form tags.
    pub tags: String,
}

/// Course create/update input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    pub course_id: String,
    pub name: String,
    pub department: String,
    pub credits: i64,
    pub term: String,
    pub instructor: String,
    pub tags: String,
}

impl Course {
    pub fn to_draft(&self) -> CourseDraft {
        CourseDraft {
            course_id: self.course_id.clone(),
            name: self.name.clone(),
            department: self.department.clone(),
            credits: self.credits,
            term: self.term.clone(),
            instructor: self.instructor.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Field names used for per-field course errors.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DEPARTMENT: &str = "department";
    pub const CREDITS: &str = "credits";
    pub const TERM: &str = "term";
    pub const INSTRUCTOR: &str = "instructor";
}

/// Returns whether `credits` is an accepted credit count.
pub fn credits_in_range(credits: i64) -> bool {
    (MIN_CREDITS..=MAX_CREDITS).contains(&credits)
}

/// Whether a blank-trimmed `course_id` is already used in `courses`.
pub fn business_id_taken(courses: &[Course], course_id: &str) -> bool {
    let course_id = course_id.trim();
    !course_id.is_empty() && courses.iter().any(|course| course.course_id == course_id)
}

impl Entity for Course {
    const ENTITY: &'static str = "course";
    const LABEL: &'static str = "course";
    const PLURAL: &'static str = "courses";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        COURSE_FIELD_NAME,
        COURSE_FIELD_BUSINESS_ID,
        COURSE_FIELD_DEPARTMENT,
        COURSE_FIELD_CREDITS,
        COURSE_FIELD_TERM,
        COURSE_FIELD_INSTRUCTOR,
        FIELD_TAGS,
    ];
    const CREATE_FIELDS: &'static [&'static str] = &[
        COURSE_FIELD_NAME,
        COURSE_FIELD_BUSINESS_ID,
        COURSE_FIELD_DEPARTMENT,
        COURSE_FIELD_CREDITS,
        COURSE_FIELD_TERM,
        COURSE_FIELD_INSTRUCTOR,
        FIELD_TAGS,
    ];
    const UPDATE_FIELDS: &'static [&'static str] = &[
        COURSE_FIELD_NAME,
        COURSE_FIELD_DEPARTMENT,
        COURSE_FIELD_CREDITS,
        COURSE_FIELD_TERM,
        COURSE_FIELD_INSTRUCTOR,
        FIELD_TAGS,
    ];
    const INTEGER_FIELDS: &'static [&'static str] = &[COURSE_FIELD_CREDITS];
    const ORDER_BY: Option<(&'static str, SortDirection)> =
        Some((COURSE_FIELD_NAME, SortDirection::Ascending));

    type Draft = CourseDraft;
    type Filter = CourseFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            course_id: record.text(Self::ENTITY, COURSE_FIELD_BUSINESS_ID)?,
            name: record.text(Self::ENTITY, COURSE_FIELD_NAME)?,
            department: record.text_or_empty(COURSE_FIELD_DEPARTMENT),
            credits: record.integer(Self::ENTITY, COURSE_FIELD_CREDITS)?,
            term: record.text_or_empty(COURSE_FIELD_TERM),
            instructor: record.text_or_empty(COURSE_FIELD_INSTRUCTOR),
            tags: record.text_or_empty(FIELD_TAGS),
        })
    }

    fn draft_fields(draft: &CourseDraft) -> FieldMap {
        FieldMap::from([
            (COURSE_FIELD_NAME.to_string(), FieldValue::from(draft.name.trim())),
            (
                COURSE_FIELD_BUSINESS_ID.to_string(),
                FieldValue::from(draft.course_id.trim()),
            ),
            (
                COURSE_FIELD_DEPARTMENT.to_string(),
                FieldValue::from(draft.department.as_str()),
            ),
            (COURSE_FIELD_CREDITS.to_string(), FieldValue::from(draft.credits)),
            (COURSE_FIELD_TERM.to_string(), FieldValue::from(draft.term.as_str())),
            (
                COURSE_FIELD_INSTRUCTOR.to_string(),
                FieldValue::from(draft.instructor.trim()),
            ),
            (FIELD_TAGS.to_string(), FieldValue::from(draft.tags.as_str())),
        ])
    }

    fn validate(draft: &CourseDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, fields::ID, &draft.course_id, "Course ID is required");
        require(&mut errors, fields::NAME, &draft.name, "Course name is required");
        require(
            &mut errors,
            fields::INSTRUCTOR,
            &draft.instructor,
            "Instructor name is required",
        );
        require(
            &mut errors,
            fields::DEPARTMENT,
            &draft.department,
            "Department is required",
        );
        require(&mut errors, fields::TERM, &draft.term, "Term is required");
        if !credits_in_range(draft.credits) {
            errors.add(
                fields::CREDITS,
                format!("Credits must be between {MIN_CREDITS} and {MAX_CREDITS}"),
            );
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::{business_id_taken, fields, Course, CourseDraft};
    use crate::model::record::{FieldValue, Record};
    use crate::model::schema::Entity;

    fn draft(credits: i64) -> CourseDraft {
        CourseDraft {
            course_id: "CS101".to_string(),
            name: "Intro".to_string(),
            department: "Computer Science".to_string(),
            credits,
            term: "Fall 2023".to_string(),
            instructor: "Dr. Turing".to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn credits_outside_range_are_rejected() {
        for credits in [-1, 0, 7, 12] {
            let errors = Course::validate(&draft(credits)).unwrap_err();
            assert!(errors.contains(fields::CREDITS), "credits={credits}");
        }
        for credits in 1..=6 {
            assert!(Course::validate(&draft(credits)).is_ok(), "credits={credits}");
        }
    }

    #[test]
    fn blank_required_fields_are_reported_per_field() {
        let mut input = draft(3);
        input.course_id = "  ".to_string();
        input.instructor = String::new();
        let errors = Course::validate(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(fields::ID), Some("Course ID is required"));
        assert!(errors.contains(fields::INSTRUCTOR));
    }

    #[test]
    fn record_mapping_roundtrips_draft_fields() {
        let input = draft(4);
        let record = Record::new(7, 0, Course::draft_fields(&input));
        let course = Course::from_record(&record).unwrap();
        assert_eq!(course.id, 7);
        assert_eq!(course.to_draft(), input);
        assert_eq!(record.get("credits"), Some(&FieldValue::Integer(4)));
    }

    #[test]
    fn business_id_lookup_is_exact_and_ignores_blank() {
        let courses = vec![Course {
            id: 1,
            course_id: "CS101".to_string(),
            name: "Intro".to_string(),
            department: "Computer Science".to_string(),
            credits: 3,
            term: "Fall 2023".to_string(),
            instructor: "Dr. Turing".to_string(),
            tags: String::new(),
        }];
        assert!(business_id_taken(&courses, " CS101 "));
        assert!(!business_id_taken(&courses, "cs101"));
        assert!(!business_id_taken(&courses, "  "));
    }
}
