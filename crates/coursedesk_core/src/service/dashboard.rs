//! Dashboard aggregation.
//!
//! # Responsibility
//! - Fan out the four summary fetches in parallel and reduce them to tiles.
//!
//! # Invariants
//! - Count fetches degrade to zero individually and never fail the join.
//! - A failed course list fetch fails the join; the result is then an
//!   empty tile list, never a partial one.
//! - "Upcoming" means dated on or after `today` (ISO string comparison).

use crate::filter::CourseFilter;
use crate::model::assignment::Assignment;
use crate::model::course::Course;
use crate::model::exam::Exam;
use crate::model::student::Student;
use crate::notify::Notifier;
use crate::service::entity::EntityService;
use crate::service::{join_task, ServiceResult};
use crate::store::RecordStore;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::sync::Arc;
use std::thread;

/// One summary tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTile {
    pub id: u8,
    pub title: &'static str,
    pub value: usize,
    /// Icon name understood by the presentation layer.
    pub icon: &'static str,
}

/// Raw aggregated counts before tile formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub courses: usize,
    pub students: usize,
    pub upcoming_exams: usize,
    pub upcoming_assignments: usize,
}

impl DashboardCounts {
    pub fn into_tiles(self) -> Vec<StatTile> {
        vec![
            StatTile {
                id: 1,
                title: "Active Courses",
                value: self.courses,
                icon: "book-open",
            },
            StatTile {
                id: 2,
                title: "Total Students",
                value: self.students,
                icon: "users",
            },
            StatTile {
                id: 3,
                title: "Upcoming Exams",
                value: self.upcoming_exams,
                icon: "calendar",
            },
            StatTile {
                id: 4,
                title: "Assignments Due",
                value: self.upcoming_assignments,
                icon: "clipboard-list",
            },
        ]
    }
}

/// Aggregates dashboard statistics across entity services.
pub struct DashboardService<S> {
    courses: EntityService<S, Course>,
    students: EntityService<S, Student>,
    exams: EntityService<S, Exam>,
    assignments: EntityService<S, Assignment>,
}

impl<S: RecordStore + Clone> DashboardService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            courses: EntityService::new(store.clone(), Arc::clone(&notifier)),
            students: EntityService::new(store.clone(), Arc::clone(&notifier)),
            exams: EntityService::new(store.clone(), Arc::clone(&notifier)),
            assignments: EntityService::new(store, notifier),
        }
    }

    /// Tiles computed against the local calendar date.
    pub fn stats(&self) -> Vec<StatTile> {
        self.stats_on(Local::now().date_naive())
    }

    /// Tiles computed against `today`; empty when the join fails.
    pub fn stats_on(&self, today: NaiveDate) -> Vec<StatTile> {
        match self.counts_on(today) {
            Ok(counts) => {
                info!(
                    "event=dashboard_stats module=service status=ok courses={} students={} exams={} assignments={}",
                    counts.courses,
                    counts.students,
                    counts.upcoming_exams,
                    counts.upcoming_assignments
                );
                counts.into_tiles()
            }
            Err(err) => {
                warn!("event=dashboard_stats module=service status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Runs the four fetches concurrently and joins every one of them
    /// before combining results.
    pub fn counts_on(&self, today: NaiveDate) -> ServiceResult<DashboardCounts> {
        thread::scope(|scope| {
            let courses = scope.spawn(|| self.courses.list(&CourseFilter::default()));
            let students = scope.spawn(|| Ok(self.students.count()));
            let exams = scope.spawn(|| Ok(self.exams.upcoming_count(today)));
            let assignments = scope.spawn(|| Ok(self.assignments.upcoming_count(today)));

            let courses = join_task("courses", courses);
            let students = join_task("students", students);
            let exams = join_task("exams", exams);
            let assignments = join_task("assignments", assignments);

            Ok(DashboardCounts {
                courses: courses?.len(),
                students: students?,
                upcoming_exams: exams?,
                upcoming_assignments: assignments?,
            })
        })
    }
}
