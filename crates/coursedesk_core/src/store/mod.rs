//! Record store contract and implementations.
//!
//! # Responsibility
//! - Define the key-field record store consumed by entity services.
//! - Keep storage details (SQL, JSON encoding) behind the trait boundary.
//!
//! # Invariants
//! - Stores assign `RecordId`s; callers never choose them.
//! - Writes touch only the fields supplied; other stored fields survive.
//! - Implementations are `Send + Sync` so fan-out callers can share them.

pub mod query;
mod sqlite;

pub use sqlite::SqliteRecordStore;

use crate::db::DbError;
use crate::model::record::{FieldMap, Record, RecordId};
use query::FetchQuery;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failures.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound {
        entity: String,
        id: RecordId,
    },
    /// Field name cannot be addressed by the store.
    InvalidField(String),
    /// Persisted record content could not be decoded.
    InvalidData(String),
    /// Store is not reachable (lock poisoned, backend down).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} record not found: {id}"),
            Self::InvalidField(field) => write!(f, "invalid field name `{field}`"),
            Self::InvalidData(message) => write!(f, "invalid stored record: {message}"),
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Field changes for one existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub id: RecordId,
    pub fields: FieldMap,
}

/// Remote key-field record store.
pub trait RecordStore: Send + Sync {
    /// Returns records of `entity` matching `query`.
    fn fetch_records(&self, entity: &str, query: &FetchQuery) -> StoreResult<Vec<Record>>;

    /// Inserts one record per field map and returns the stored records.
    fn create_records(&self, entity: &str, records: Vec<FieldMap>) -> StoreResult<Vec<Record>>;

    /// Merges field changes into existing records and returns them.
    fn update_records(
        &self,
        entity: &str,
        updates: Vec<RecordUpdate>,
    ) -> StoreResult<Vec<Record>>;

    /// Deletes records by id. Missing ids are reported as `NotFound`.
    fn delete_records(&self, entity: &str, ids: &[RecordId]) -> StoreResult<()>;

    /// Gets one record projected to `fields` (all fields when empty).
    fn get_record_by_id(
        &self,
        entity: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn fetch_records(&self, entity: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        (**self).fetch_records(entity, query)
    }

    fn create_records(&self, entity: &str, records: Vec<FieldMap>) -> StoreResult<Vec<Record>> {
        (**self).create_records(entity, records)
    }

    fn update_records(
        &self,
        entity: &str,
        updates: Vec<RecordUpdate>,
    ) -> StoreResult<Vec<Record>> {
        (**self).update_records(entity, updates)
    }

    fn delete_records(&self, entity: &str, ids: &[RecordId]) -> StoreResult<()> {
        (**self).delete_records(entity, ids)
    }

    fn get_record_by_id(
        &self,
        entity: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        (**self).get_record_by_id(entity, id, fields)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn fetch_records(&self, entity: &str, query: &FetchQuery) -> StoreResult<Vec<Record>> {
        (**self).fetch_records(entity, query)
    }

    fn create_records(&self, entity: &str, records: Vec<FieldMap>) -> StoreResult<Vec<Record>> {
        (**self).create_records(entity, records)
    }

    fn update_records(
        &self,
        entity: &str,
        updates: Vec<RecordUpdate>,
    ) -> StoreResult<Vec<Record>> {
        (**self).update_records(entity, updates)
    }

    fn delete_records(&self, entity: &str, ids: &[RecordId]) -> StoreResult<()> {
        (**self).delete_records(entity, ids)
    }

    fn get_record_by_id(
        &self,
        entity: &str,
        id: RecordId,
        fields: &[String],
    ) -> StoreResult<Option<Record>> {
        (**self).get_record_by_id(entity, id, fields)
    }
}
