//! Assignment-specific service operations.

use crate::model::assignment::{Assignment, AssignmentFilter};
use crate::model::record::RecordId;
use crate::model::schema::RecordFilter;
use crate::service::entity::EntityService;
use crate::service::ServiceResult;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub type AssignmentService<S> = EntityService<S, Assignment>;

impl<S: RecordStore> EntityService<S, Assignment> {
    /// Lists a course's assignments ordered by due date.
    pub fn for_course(&self, course: RecordId) -> ServiceResult<Vec<Assignment>> {
        self.list(&AssignmentFilter {
            course: Some(course),
            due_from: None,
        })
    }

    /// Counts assignments due on or after `today`; zero on failure.
    pub fn upcoming_count(&self, today: NaiveDate) -> usize {
        let mut query = self.base_query();
        AssignmentFilter {
            course: None,
            due_from: Some(today),
        }
        .apply(&mut query);
        self.count_where(query)
    }
}
