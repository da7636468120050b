//! Student-specific service operations.

use crate::model::student::{Student, StudentFilter};
use crate::service::entity::EntityService;
use crate::service::ServiceResult;
use crate::store::RecordStore;

pub type StudentService<S> = EntityService<S, Student>;

impl<S: RecordStore> EntityService<S, Student> {
    /// Searches students by name, business id or email.
    pub fn search(&self, text: impl Into<String>) -> ServiceResult<Vec<Student>> {
        self.list(&StudentFilter {
            search: text.into(),
        })
    }

    /// Total student count; zero on failure.
    pub fn count(&self) -> usize {
        self.count_where(self.base_query())
    }
}
