//! Course detail loading: one course plus its assignments and roster.

use crate::model::assignment::Assignment;
use crate::model::course::Course;
use crate::model::record::RecordId;
use crate::notify::Notifier;
use crate::service::enrollments::{EnrolledStudent, EnrollmentService};
use crate::service::entity::EntityService;
use crate::service::{join_task, ServiceResult};
use crate::store::RecordStore;
use log::info;
use std::sync::Arc;
use std::thread;

/// Everything the course detail page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOverview {
    pub course: Course,
    pub assignments: Vec<Assignment>,
    pub students: Vec<EnrolledStudent>,
}

pub struct CourseDetailService<S> {
    courses: EntityService<S, Course>,
    assignments: EntityService<S, Assignment>,
    enrollments: EnrollmentService<S>,
}

impl<S: RecordStore + Clone> CourseDetailService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            courses: EntityService::new(store.clone(), Arc::clone(&notifier)),
            assignments: EntityService::new(store.clone(), Arc::clone(&notifier)),
            enrollments: EnrollmentService::new(store, notifier),
        }
    }

    /// Loads a course and, in parallel, its assignments and enrolled
    /// students.
    ///
    /// Returns `Ok(None)` when the course does not exist. Any failing
    /// related fetch fails the whole load.
    pub fn load(&self, course_id: RecordId) -> ServiceResult<Option<CourseOverview>> {
        let Some(course) = self.courses.get_by_id(course_id)? else {
            info!("event=course_detail module=service status=not_found course={course_id}");
            return Ok(None);
        };

        let (assignments, students) = thread::scope(|scope| {
            let assignments = scope.spawn(|| self.assignments.for_course(course_id));
            let students = scope.spawn(|| self.enrollments.students_for_course(course_id));
            (
                join_task("assignments", assignments),
                join_task("students", students),
            )
        });

        Ok(Some(CourseOverview {
            course,
            assignments: assignments?,
            students: students?,
        }))
    }
}
