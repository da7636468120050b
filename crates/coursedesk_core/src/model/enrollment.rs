//! Enrollment (`student_course`) entity linking one student to one course.
//!
//! # Invariants
//! - At most one enrollment per (student, course) pair is intended; the
//!   check happens before insert and is not atomic.

use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::{Entity, RecordFilter};
use crate::store::query::{Condition, FetchQuery};

pub const ENROLLMENT_FIELD_STUDENT: &str = "student";
pub const ENROLLMENT_FIELD_COURSE: &str = "course";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enrollment {
    pub id: RecordId,
    pub student: RecordId,
    pub course: RecordId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentDraft {
    pub student: RecordId,
    pub course: RecordId,
}

/// Enrollment filter; both references are optional and AND'd.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentFilter {
    pub student: Option<RecordId>,
    pub course: Option<RecordId>,
}

impl EnrollmentFilter {
    pub fn pair(student: RecordId, course: RecordId) -> Self {
        Self {
            student: Some(student),
            course: Some(course),
        }
    }
}

impl RecordFilter for EnrollmentFilter {
    fn apply(&self, query: &mut FetchQuery) {
        if let Some(student) = self.student {
            query
                .where_conditions
                .push(Condition::exact(ENROLLMENT_FIELD_STUDENT, student));
        }
        if let Some(course) = self.course {
            query
                .where_conditions
                .push(Condition::exact(ENROLLMENT_FIELD_COURSE, course));
        }
    }
}

impl Entity for Enrollment {
    const ENTITY: &'static str = "student_course";
    const LABEL: &'static str = "enrollment";
    const PLURAL: &'static str = "enrollments";
    const FIELDS: &'static [&'static str] =
        &["Id", "Name", ENROLLMENT_FIELD_STUDENT, ENROLLMENT_FIELD_COURSE];
    const CREATE_FIELDS: &'static [&'static str] =
        &["Name", ENROLLMENT_FIELD_STUDENT, ENROLLMENT_FIELD_COURSE];
    const UPDATE_FIELDS: &'static [&'static str] =
        &[ENROLLMENT_FIELD_STUDENT, ENROLLMENT_FIELD_COURSE];
    const INTEGER_FIELDS: &'static [&'static str] =
        &[ENROLLMENT_FIELD_STUDENT, ENROLLMENT_FIELD_COURSE];

    type Draft = EnrollmentDraft;
    type Filter = EnrollmentFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            student: record.integer(Self::ENTITY, ENROLLMENT_FIELD_STUDENT)?,
            course: record.integer(Self::ENTITY, ENROLLMENT_FIELD_COURSE)?,
        })
    }

    fn draft_fields(draft: &EnrollmentDraft) -> FieldMap {
        FieldMap::from([
            (
                "Name".to_string(),
                FieldValue::from(format!("Enrollment-{}-{}", draft.student, draft.course)),
            ),
            (ENROLLMENT_FIELD_STUDENT.to_string(), FieldValue::from(draft.student)),
            (ENROLLMENT_FIELD_COURSE.to_string(), FieldValue::from(draft.course)),
        ])
    }
}
