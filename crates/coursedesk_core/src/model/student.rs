//! Student entity.
//!
//! `student_id` is the business key and is immutable after creation.

use crate::filter::search_group;
use crate::model::course::FIELD_TAGS;
use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::{Entity, RecordFilter};
use crate::model::validation::{require, FieldErrors};
use crate::store::query::{FetchQuery, SortDirection};

pub const STUDENT_FIELD_BUSINESS_ID: &str = "student_id";
pub const STUDENT_FIELD_FULL_NAME: &str = "full_name";
pub const STUDENT_FIELD_EMAIL: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: RecordId,
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub tags: String,
}

/// Free-text student search across name, business id and email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub search: String,
}

impl StudentFilter {
    pub const SEARCH_FIELDS: [&'static str; 3] =
        ["Name", STUDENT_FIELD_BUSINESS_ID, STUDENT_FIELD_EMAIL];
}

impl RecordFilter for StudentFilter {
    fn apply(&self, query: &mut FetchQuery) {
        if let Some(group) = search_group(&self.search, &Self::SEARCH_FIELDS) {
            query.where_groups.push(group);
        }
    }
}

impl Entity for Student {
    const ENTITY: &'static str = "student";
    const LABEL: &'static str = "student";
    const PLURAL: &'static str = "students";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "Name",
        STUDENT_FIELD_BUSINESS_ID,
        STUDENT_FIELD_FULL_NAME,
        STUDENT_FIELD_EMAIL,
        FIELD_TAGS,
    ];
    const CREATE_FIELDS: &'static [&'static str] = &[
        "Name",
        STUDENT_FIELD_BUSINESS_ID,
        STUDENT_FIELD_FULL_NAME,
        STUDENT_FIELD_EMAIL,
        FIELD_TAGS,
    ];
    const UPDATE_FIELDS: &'static [&'static str] = &[
        "Name",
        STUDENT_FIELD_FULL_NAME,
        STUDENT_FIELD_EMAIL,
        FIELD_TAGS,
    ];
    const ORDER_BY: Option<(&'static str, SortDirection)> =
        Some(("Name", SortDirection::Ascending));

    type Draft = StudentDraft;
    type Filter = StudentFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            student_id: record.text(Self::ENTITY, STUDENT_FIELD_BUSINESS_ID)?,
            full_name: record.text(Self::ENTITY, STUDENT_FIELD_FULL_NAME)?,
            email: record.text_or_empty(STUDENT_FIELD_EMAIL),
            tags: record.text_or_empty(FIELD_TAGS),
        })
    }

    fn draft_fields(draft: &StudentDraft) -> FieldMap {
        let full_name = draft.full_name.trim();
        FieldMap::from([
            ("Name".to_string(), FieldValue::from(full_name)),
            (
                STUDENT_FIELD_BUSINESS_ID.to_string(),
                FieldValue::from(draft.student_id.trim()),
            ),
            (STUDENT_FIELD_FULL_NAME.to_string(), FieldValue::from(full_name)),
            (
                STUDENT_FIELD_EMAIL.to_string(),
                FieldValue::from(draft.email.trim()),
            ),
            (FIELD_TAGS.to_string(), FieldValue::from(draft.tags.as_str())),
        ])
    }

    fn validate(draft: &StudentDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(
            &mut errors,
            "student_id",
            &draft.student_id,
            "Student ID is required",
        );
        require(
            &mut errors,
            "full_name",
            &draft.full_name,
            "Full name is required",
        );
        errors.into_result()
    }
}
