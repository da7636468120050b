//! Course-specific service operations.

use crate::model::course::{Course, COURSE_FIELD_BUSINESS_ID};
use crate::model::schema::Entity;
use crate::service::entity::EntityService;
use crate::service::ServiceResult;
use crate::store::query::{Condition, FetchQuery, SortDirection};
use crate::store::RecordStore;
use log::error;

pub type CourseService<S> = EntityService<S, Course>;

/// Default number of courses returned by [`EntityService::recent`].
pub const RECENT_COURSES_DEFAULT_LIMIT: u32 = 4;

impl<S: RecordStore> EntityService<S, Course> {
    /// Returns the most recently created courses, newest first.
    ///
    /// Failures are logged but not notified.
    pub fn recent(&self, limit: Option<u32>) -> ServiceResult<Vec<Course>> {
        let query = FetchQuery::select(Course::FIELDS)
            .order("CreatedOn", SortDirection::Descending)
            .order("Id", SortDirection::Descending)
            .limit(limit.unwrap_or(RECENT_COURSES_DEFAULT_LIMIT));

        self.fetch(&query).inspect_err(|err| {
            error!("event=courses_recent module=service status=error error={err}");
        })
    }

    /// Looks a course up by its business id (exact match).
    pub fn find_by_business_id(&self, course_id: &str) -> ServiceResult<Option<Course>> {
        let query = self
            .base_query()
            .and_where(Condition::exact(COURSE_FIELD_BUSINESS_ID, course_id.trim()))
            .limit(1);
        Ok(self.fetch(&query)?.into_iter().next())
    }
}
