//! Enrollment use-cases: roster lookup, enroll and unenroll.
//!
//! # Invariants
//! - `enroll` never creates a second record for an existing
//!   (student, course) pair it can observe.
//! - The existence check and the insert are separate store calls; a
//!   concurrent writer can still produce a duplicate.

use crate::model::enrollment::{Enrollment, EnrollmentDraft, EnrollmentFilter};
use crate::model::record::RecordId;
use crate::model::schema::RecordFilter;
use crate::model::student::Student;
use crate::notify::{Notice, Notifier};
use crate::service::entity::EntityService;
use crate::service::{ServiceError, ServiceResult};
use crate::store::query::Condition;
use crate::store::RecordStore;
use log::{error, info};
use std::sync::Arc;

/// Student row of a course roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledStudent {
    pub student: Student,
    /// Enrollment record linking the student to the course.
    pub enrollment_id: RecordId,
}

/// Result of an enroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// A new enrollment record was created.
    Enrolled(Enrollment),
    /// The pair was already enrolled; nothing was written.
    AlreadyEnrolled(Enrollment),
    /// The store accepted the write but returned no record.
    Unconfirmed,
}

impl EnrollOutcome {
    pub fn enrollment(&self) -> Option<&Enrollment> {
        match self {
            Self::Enrolled(enrollment) | Self::AlreadyEnrolled(enrollment) => Some(enrollment),
            Self::Unconfirmed => None,
        }
    }
}

/// Enrollment service facade over enrollment and student records.
pub struct EnrollmentService<S> {
    enrollments: EntityService<S, Enrollment>,
    students: EntityService<S, Student>,
}

impl<S: Clone> Clone for EnrollmentService<S> {
    fn clone(&self) -> Self {
        Self {
            enrollments: self.enrollments.clone(),
            students: self.students.clone(),
        }
    }
}

impl<S: RecordStore + Clone> EnrollmentService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            enrollments: EntityService::new(store.clone(), Arc::clone(&notifier)),
            students: EntityService::new(store, notifier),
        }
    }

    pub fn enrollments(&self) -> &EntityService<S, Enrollment> {
        &self.enrollments
    }

    /// Lists students enrolled in `course`, each with its enrollment id.
    ///
    /// Students are ordered by name. A course with no enrollments yields an
    /// empty list without querying students.
    pub fn students_for_course(&self, course: RecordId) -> ServiceResult<Vec<EnrolledStudent>> {
        self.load_roster(course).map_err(|err| {
            error!(
                "event=course_roster module=service status=error course={course} error={err}"
            );
            self.enrollments
                .notifier()
                .notify(Notice::error("Failed to fetch enrolled students"));
            err
        })
    }

    /// Enrolls `student` in `course` unless the pair already exists.
    ///
    /// A failure at either the lookup or the insert is notified once as
    /// "Failed to enroll student".
    pub fn enroll(&self, student: RecordId, course: RecordId) -> ServiceResult<EnrollOutcome> {
        let existing = self
            .find_pair(student, course)
            .map_err(|err| self.enroll_failed(student, course, err))?;

        if let Some(enrollment) = existing {
            info!(
                "event=enroll module=service status=duplicate student={student} course={course} enrollment={}",
                enrollment.id
            );
            self.enrollments
                .notifier()
                .notify(Notice::warning("Student is already enrolled in this course"));
            return Ok(EnrollOutcome::AlreadyEnrolled(enrollment));
        }

        let created = self
            .enrollments
            .create_unreported(&EnrollmentDraft { student, course })
            .map_err(|err| self.enroll_failed(student, course, err))?;
        Ok(created.map_or(EnrollOutcome::Unconfirmed, EnrollOutcome::Enrolled))
    }

    /// Removes one enrollment record.
    pub fn unenroll(&self, enrollment_id: RecordId) -> ServiceResult<bool> {
        self.enrollments.delete(enrollment_id)
    }

    fn enroll_failed(
        &self,
        student: RecordId,
        course: RecordId,
        err: ServiceError,
    ) -> ServiceError {
        error!(
            "event=enroll module=service status=error student={student} course={course} error={err}"
        );
        self.enrollments
            .notifier()
            .notify(Notice::error("Failed to enroll student"));
        err
    }

    fn find_pair(&self, student: RecordId, course: RecordId) -> ServiceResult<Option<Enrollment>> {
        let mut query = self.enrollments.base_query().limit(1);
        EnrollmentFilter::pair(student, course).apply(&mut query);
        Ok(self.enrollments.fetch(&query)?.into_iter().next())
    }

    fn load_roster(&self, course: RecordId) -> ServiceResult<Vec<EnrolledStudent>> {
        let mut query = self.enrollments.base_query();
        EnrollmentFilter {
            student: None,
            course: Some(course),
        }
        .apply(&mut query);
        let enrollments = self.enrollments.fetch(&query)?;
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let student_query = self.students.base_query().and_where(Condition::exact_any(
            "Id",
            enrollments.iter().map(|enrollment| enrollment.student),
        ));
        let students = self.students.fetch(&student_query)?;

        Ok(students
            .into_iter()
            .filter_map(|student| {
                enrollments
                    .iter()
                    .find(|enrollment| enrollment.student == student.id)
                    .map(|enrollment| EnrolledStudent {
                        enrollment_id: enrollment.id,
                        student,
                    })
            })
            .collect())
    }
}
