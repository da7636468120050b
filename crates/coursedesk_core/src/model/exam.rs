//! Exam entity, attached to one course.

use crate::model::course::FIELD_TAGS;
use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::{Entity, RecordFilter};
use crate::model::validation::{require, FieldErrors};
use crate::store::query::{Condition, FetchQuery, SortDirection};
use chrono::NaiveDate;

pub const EXAM_FIELD_TITLE: &str = "title";
pub const EXAM_FIELD_DATE: &str = "date";
pub const EXAM_FIELD_COURSE: &str = "course";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    pub id: RecordId,
    pub title: String,
    pub date: NaiveDate,
    pub course: RecordId,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDraft {
    pub title: String,
    pub date: NaiveDate,
    pub course: RecordId,
    pub tags: String,
}

/// Exam list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamFilter {
    pub course: Option<RecordId>,
    /// Keeps exams on or after this date.
    pub from: Option<NaiveDate>,
}

impl RecordFilter for ExamFilter {
    fn apply(&self, query: &mut FetchQuery) {
        if let Some(course) = self.course {
            query
                .where_conditions
                .push(Condition::exact(EXAM_FIELD_COURSE, course));
        }
        if let Some(from) = self.from {
            query
                .where_conditions
                .push(Condition::at_least(EXAM_FIELD_DATE, from));
        }
    }
}

impl Entity for Exam {
    const ENTITY: &'static str = "exam";
    const LABEL: &'static str = "exam";
    const PLURAL: &'static str = "exams";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "Name",
        EXAM_FIELD_TITLE,
        EXAM_FIELD_DATE,
        EXAM_FIELD_COURSE,
        FIELD_TAGS,
    ];
    const CREATE_FIELDS: &'static [&'static str] = &[
        "Name",
        EXAM_FIELD_TITLE,
        EXAM_FIELD_DATE,
        EXAM_FIELD_COURSE,
        FIELD_TAGS,
    ];
    const UPDATE_FIELDS: &'static [&'static str] = Self::CREATE_FIELDS;
    const INTEGER_FIELDS: &'static [&'static str] = &[EXAM_FIELD_COURSE];
    const ORDER_BY: Option<(&'static str, SortDirection)> =
        Some((EXAM_FIELD_DATE, SortDirection::Ascending));

    type Draft = ExamDraft;
    type Filter = ExamFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            title: record.text(Self::ENTITY, EXAM_FIELD_TITLE)?,
            date: record.date(Self::ENTITY, EXAM_FIELD_DATE)?,
            course: record.integer(Self::ENTITY, EXAM_FIELD_COURSE)?,
            tags: record.text_or_empty(FIELD_TAGS),
        })
    }

    fn draft_fields(draft: &ExamDraft) -> FieldMap {
        let title = draft.title.trim();
        FieldMap::from([
            ("Name".to_string(), FieldValue::from(title)),
            (EXAM_FIELD_TITLE.to_string(), FieldValue::from(title)),
            (EXAM_FIELD_DATE.to_string(), FieldValue::from(draft.date)),
            (EXAM_FIELD_COURSE.to_string(), FieldValue::from(draft.course)),
            (FIELD_TAGS.to_string(), FieldValue::from(draft.tags.as_str())),
        ])
    }

    fn validate(draft: &ExamDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &draft.title, "Title is required");
        errors.into_result()
    }
}
