//! Entity services and aggregators.
//!
//! # Responsibility
//! - Mediate between views and the record store for every entity.
//! - Report store failures to the user once and hand the error back.
//!
//! # Invariants
//! - Services never bypass entity schema validation or write allow-lists.
//! - Service layer remains storage-agnostic (`RecordStore` only).

pub mod assignments;
pub mod course_detail;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod enrollments;
pub mod entity;
pub mod exams;
pub mod students;

use crate::model::record::SchemaError;
use crate::model::validation::FieldErrors;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::thread::ScopedJoinHandle;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by entity services.
#[derive(Debug)]
pub enum ServiceError {
    /// Draft failed schema validation before reaching the store.
    Validation(FieldErrors),
    /// Record store call failed.
    Store(StoreError),
    /// Stored record does not match the entity schema.
    Schema(SchemaError),
    /// A parallel fetch terminated abnormally.
    Join(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Join(task) => write!(f, "parallel fetch `{task}` panicked"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Store(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Join(_) => None,
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SchemaError> for ServiceError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

/// Joins one scoped fan-out task, turning a panic into `ServiceError::Join`.
pub(crate) fn join_task<T>(
    task: &'static str,
    handle: ScopedJoinHandle<'_, ServiceResult<T>>,
) -> ServiceResult<T> {
    handle.join().map_err(|_| ServiceError::Join(task))?
}
