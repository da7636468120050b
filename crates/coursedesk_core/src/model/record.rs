//! Flat record shape exchanged with the record store.
//!
//! # Responsibility
//! - Define store-level identifiers and field values.
//! - Provide typed accessors used by per-entity mapping functions.
//!
//! # Invariants
//! - `Record::id` is assigned by the store and never reused.
//! - Accessors report a `SchemaError` instead of inventing defaults for
//!   required fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier.
pub type RecordId = i64;

/// Field name to value map, ordered for stable serialization.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Date format used for every date field in the store.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Scalar value stored in one record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
            Self::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(value.format(ISO_DATE_FORMAT).to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Record mapping failure for one entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub entity: &'static str,
    pub field: String,
    pub reason: String,
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} record field `{}`: {}",
            self.entity, self.field, self.reason
        )
    }
}

impl Error for SchemaError {}

/// One stored record as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// Creation time in epoch milliseconds.
    pub created_on: i64,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(id: RecordId, created_on: i64, fields: FieldMap) -> Self {
        Self {
            id,
            created_on,
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Reads a required, non-null text field.
    pub fn text(&self, entity: &'static str, field: &str) -> Result<String, SchemaError> {
        match self.get(field) {
            Some(FieldValue::Text(value)) => Ok(value.clone()),
            Some(FieldValue::Integer(value)) => Ok(value.to_string()),
            Some(FieldValue::Null) | None => Err(missing(entity, field)),
        }
    }

    /// Reads an optional text field; missing or null becomes empty.
    pub fn text_or_empty(&self, field: &str) -> String {
        match self.get(field) {
            Some(FieldValue::Text(value)) => value.clone(),
            Some(FieldValue::Integer(value)) => value.to_string(),
            Some(FieldValue::Null) | None => String::new(),
        }
    }

    /// Reads a required integer field, accepting numeric text.
    pub fn integer(&self, entity: &'static str, field: &str) -> Result<i64, SchemaError> {
        let value = self.get(field).ok_or_else(|| missing(entity, field))?;
        value.as_integer().ok_or_else(|| SchemaError {
            entity,
            field: field.to_string(),
            reason: format!("expected integer, got {value:?}"),
        })
    }

    /// Reads a required ISO date field.
    pub fn date(&self, entity: &'static str, field: &str) -> Result<NaiveDate, SchemaError> {
        let text = self.text(entity, field)?;
        parse_iso_date(&text).ok_or_else(|| SchemaError {
            entity,
            field: field.to_string(),
            reason: format!("expected YYYY-MM-DD date, got `{text}`"),
        })
    }
}

/// Parses an ISO date, tolerating a trailing time component.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).ok()
}

fn missing(entity: &'static str, field: &str) -> SchemaError {
    SchemaError {
        entity,
        field: field.to_string(),
        reason: "missing value".to_string(),
    }
}
