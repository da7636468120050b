//! Assignment entity, attached to one course.

use crate::model::course::FIELD_TAGS;
use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::{Entity, RecordFilter};
use crate::model::validation::{require, FieldErrors};
use crate::store::query::{Condition, FetchQuery, SortDirection};
use chrono::NaiveDate;

pub const ASSIGNMENT_FIELD_TITLE: &str = "title";
pub const ASSIGNMENT_FIELD_DUE_DATE: &str = "due_date";
pub const ASSIGNMENT_FIELD_DESCRIPTION: &str = "description";
pub const ASSIGNMENT_FIELD_COURSE: &str = "course";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: RecordId,
    pub title: String,
    /// Stored as an ISO `YYYY-MM-DD` string.
    pub due_date: NaiveDate,
    pub description: String,
    /// Referenced course record id.
    pub course: RecordId,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub title: String,
    pub due_date: NaiveDate,
    pub description: String,
    pub course: RecordId,
    pub tags: String,
}

/// Assignment list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub course: Option<RecordId>,
    /// Keeps assignments due on or after this date.
    pub due_from: Option<NaiveDate>,
}

impl RecordFilter for AssignmentFilter {
    fn apply(&self, query: &mut FetchQuery) {
        if let Some(course) = self.course {
            query
                .where_conditions
                .push(Condition::exact(ASSIGNMENT_FIELD_COURSE, course));
        }
        if let Some(due_from) = self.due_from {
            query
                .where_conditions
                .push(Condition::at_least(ASSIGNMENT_FIELD_DUE_DATE, due_from));
        }
    }
}

impl Entity for Assignment {
    const ENTITY: &'static str = "assignment";
    const LABEL: &'static str = "assignment";
    const PLURAL: &'static str = "assignments";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "Name",
        ASSIGNMENT_FIELD_TITLE,
        ASSIGNMENT_FIELD_DUE_DATE,
        ASSIGNMENT_FIELD_DESCRIPTION,
        ASSIGNMENT_FIELD_COURSE,
        FIELD_TAGS,
    ];
    const CREATE_FIELDS: &'static [&'static str] = &[
        "Name",
        ASSIGNMENT_FIELD_TITLE,
        ASSIGNMENT_FIELD_DUE_DATE,
        ASSIGNMENT_FIELD_DESCRIPTION,
        ASSIGNMENT_FIELD_COURSE,
        FIELD_TAGS,
    ];
    const UPDATE_FIELDS: &'static [&'static str] = Self::CREATE_FIELDS;
    const INTEGER_FIELDS: &'static [&'static str] = &[ASSIGNMENT_FIELD_COURSE];
    const ORDER_BY: Option<(&'static str, SortDirection)> =
        Some((ASSIGNMENT_FIELD_DUE_DATE, SortDirection::Ascending));

    type Draft = AssignmentDraft;
    type Filter = AssignmentFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            title: record.text(Self::ENTITY, ASSIGNMENT_FIELD_TITLE)?,
            due_date: record.date(Self::ENTITY, ASSIGNMENT_FIELD_DUE_DATE)?,
            description: record.text_or_empty(ASSIGNMENT_FIELD_DESCRIPTION),
            course: record.integer(Self::ENTITY, ASSIGNMENT_FIELD_COURSE)?,
            tags: record.text_or_empty(FIELD_TAGS),
        })
    }

    fn draft_fields(draft: &AssignmentDraft) -> FieldMap {
        let title = draft.title.trim();
        FieldMap::from([
            ("Name".to_string(), FieldValue::from(title)),
            (ASSIGNMENT_FIELD_TITLE.to_string(), FieldValue::from(title)),
            (
                ASSIGNMENT_FIELD_DUE_DATE.to_string(),
                FieldValue::from(draft.due_date),
            ),
            (
                ASSIGNMENT_FIELD_DESCRIPTION.to_string(),
                FieldValue::from(draft.description.as_str()),
            ),
            (ASSIGNMENT_FIELD_COURSE.to_string(), FieldValue::from(draft.course)),
            (FIELD_TAGS.to_string(), FieldValue::from(draft.tags.as_str())),
        ])
    }

    fn validate(draft: &AssignmentDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &draft.title, "Title is required");
        errors.into_result()
    }
}
