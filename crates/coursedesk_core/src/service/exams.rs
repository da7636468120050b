//! Exam-specific service operations.

use crate::model::exam::{Exam, ExamFilter};
use crate::model::record::RecordId;
use crate::model::schema::RecordFilter;
use crate::service::entity::EntityService;
use crate::service::ServiceResult;
use crate::store::RecordStore;
use chrono::NaiveDate;

pub type ExamService<S> = EntityService<S, Exam>;

impl<S: RecordStore> EntityService<S, Exam> {
    /// Lists exams ordered by date, optionally limited to one course.
    pub fn for_course(&self, course: Option<RecordId>) -> ServiceResult<Vec<Exam>> {
        self.list(&ExamFilter { course, from: None })
    }

    /// Counts exams dated on or after `today`; zero on failure.
    pub fn upcoming_count(&self, today: NaiveDate) -> usize {
        let mut query = self.base_query();
        ExamFilter {
            course: None,
            from: Some(today),
        }
        .apply(&mut query);
        self.count_where(query)
    }
}
