//! Static per-entity schema consumed by the generic entity service.
//!
//! # Responsibility
//! - Declare store name, readable fields and write allow-lists per entity.
//! - Map records to domain values and drafts to field maps.
//!
//! # Invariants
//! - `CREATE_FIELDS` and `UPDATE_FIELDS` are subsets of `FIELDS`.
//! - Fields listed in `INTEGER_FIELDS` are coerced before every write.

use crate::model::record::{FieldMap, Record, RecordId, SchemaError};
use crate::model::validation::FieldErrors;
use crate::store::query::{FetchQuery, SortDirection};

/// Store-level identity and mapping rules for one entity type.
pub trait Entity: Sized + Clone {
    /// Store entity (table) name.
    const ENTITY: &'static str;
    /// Singular label used in user-facing messages.
    const LABEL: &'static str;
    /// Plural label used in user-facing messages.
    const PLURAL: &'static str;
    /// Fields requested on every read.
    const FIELDS: &'static [&'static str];
    /// Fields a create may send.
    const CREATE_FIELDS: &'static [&'static str];
    /// Fields an update may send.
    const UPDATE_FIELDS: &'static [&'static str];
    /// Fields coerced to integers before writes.
    const INTEGER_FIELDS: &'static [&'static str] = &[];
    /// Default list ordering.
    const ORDER_BY: Option<(&'static str, SortDirection)> = None;

    /// Write-side input shape.
    type Draft;
    /// List filter shape.
    type Filter: RecordFilter + Default;

    fn id(&self) -> RecordId;

    fn from_record(record: &Record) -> Result<Self, SchemaError>;

    /// Produces every writable field; the service applies allow-lists.
    fn draft_fields(draft: &Self::Draft) -> FieldMap;

    /// Schema-level checks run before any write reaches the store.
    fn validate(_draft: &Self::Draft) -> Result<(), FieldErrors> {
        Ok(())
    }
}

/// Translates a filter value into store predicates.
pub trait RecordFilter {
    fn apply(&self, query: &mut FetchQuery);
}

/// Filter that adds no predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFilter;

impl RecordFilter for NoFilter {
    fn apply(&self, _query: &mut FetchQuery) {}
}

/// Splits free-form comma-separated tags into trimmed, non-empty items.
pub fn split_tags(tags: &str) -> Vec<&str> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}
