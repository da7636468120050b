//! Domain model for the course dashboard.
//!
//! # Responsibility
//! - Define per-entity domain types and their store schemas.
//! - Keep record mapping at one boundary so services never touch raw maps.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned `RecordId`.
//! - Writes only send allow-listed fields declared by the entity schema.

pub mod assignment;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod exam;
pub mod record;
pub mod schema;
pub mod student;
pub mod validation;
