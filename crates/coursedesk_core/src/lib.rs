//! Course management core: entity records, services over a record store,
//! list filtering, the course form and dashboard aggregation.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod filter;
pub mod form;
pub mod logging;
pub mod model;
pub mod notify;
pub mod preferences;
pub mod service;
pub mod store;
pub mod view;

pub use app::AppContext;
pub use config::{ConfigError, CoreConfig};
pub use filter::CourseFilter;
pub use form::{CourseField, CourseForm, FormError, FormMode, FormState};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::Assignment;
pub use model::course::Course;
pub use model::department::Department;
pub use model::enrollment::Enrollment;
pub use model::exam::Exam;
pub use model::record::{FieldMap, FieldValue, Record, RecordId};
pub use model::student::Student;
pub use model::validation::FieldErrors;
pub use notify::{Notice, NoticeLevel, NoticeQueue, Notifier};
pub use service::dashboard::{DashboardService, StatTile};
pub use service::entity::EntityService;
pub use service::{ServiceError, ServiceResult};
pub use store::{RecordStore, SqliteRecordStore, StoreError, StoreResult};
pub use view::CourseListView;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
