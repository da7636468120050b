//! Department entity. Department names feed course filter options.

use crate::model::course::FIELD_TAGS;
use crate::model::record::{FieldMap, FieldValue, Record, RecordId, SchemaError};
use crate::model::schema::{Entity, NoFilter};
use crate::model::validation::{require, FieldErrors};
use crate::store::query::SortDirection;

pub const DEPARTMENT_FIELD_CODE: &str = "code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentDraft {
    pub name: String,
    pub code: String,
    pub tags: String,
}

impl Entity for Department {
    const ENTITY: &'static str = "department";
    const LABEL: &'static str = "department";
    const PLURAL: &'static str = "departments";
    const FIELDS: &'static [&'static str] = &["Id", "Name", DEPARTMENT_FIELD_CODE, FIELD_TAGS];
    const CREATE_FIELDS: &'static [&'static str] = &["Name", DEPARTMENT_FIELD_CODE, FIELD_TAGS];
    const UPDATE_FIELDS: &'static [&'static str] = Self::CREATE_FIELDS;
    const ORDER_BY: Option<(&'static str, SortDirection)> =
        Some(("Name", SortDirection::Ascending));

    type Draft = DepartmentDraft;
    type Filter = NoFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, SchemaError> {
        Ok(Self {
            id: record.id,
            name: record.text(Self::ENTITY, "Name")?,
            code: record.text_or_empty(DEPARTMENT_FIELD_CODE),
            tags: record.text_or_empty(FIELD_TAGS),
        })
    }

    fn draft_fields(draft: &DepartmentDraft) -> FieldMap {
        FieldMap::from([
            ("Name".to_string(), FieldValue::from(draft.name.trim())),
            (
                DEPARTMENT_FIELD_CODE.to_string(),
                FieldValue::from(draft.code.trim()),
            ),
            (FIELD_TAGS.to_string(), FieldValue::from(draft.tags.as_str())),
        ])
    }

    fn validate(draft: &DepartmentDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &draft.name, "Department name is required");
        errors.into_result()
    }
}
