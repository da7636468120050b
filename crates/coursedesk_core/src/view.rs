//! Course list view state: cached rows, filter inputs and row actions.
//!
//! # Invariants
//! - `courses` mirrors the last successful fetch plus this view's own
//!   successful writes; nothing else mutates it.
//! - Deletes mutate local state only after the store call succeeds.
//! - `loading` is cleared on every exit path of a store call.

use crate::filter::{CourseFilter, ALL};
use crate::model::course::Course;
use crate::model::record::RecordId;
use crate::notify::Notice;
use crate::service::courses::CourseService;
use crate::service::departments::SelectOption;
use crate::service::ServiceResult;
use crate::store::RecordStore;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct CourseListView {
    courses: Vec<Course>,
    filter: CourseFilter,
    loading: bool,
}

impl CourseListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses,
            ..Self::default()
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn filter(&self) -> &CourseFilter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rows passing the current filter, in cached order.
    pub fn visible(&self) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|course| self.filter.matches(course))
            .collect()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_department(&mut self, department: impl Into<String>) {
        self.filter.department = department.into();
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.filter.term = term.into();
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
    }

    /// Replaces the cache with the full, unfiltered course list.
    pub fn refresh<S: RecordStore>(&mut self, service: &CourseService<S>) -> ServiceResult<()> {
        self.loading = true;
        let result = service.list(&CourseFilter::default());
        self.loading = false;
        self.courses = result?;
        Ok(())
    }

    /// Replaces a row with the same record id, or appends a new one.
    pub fn upsert(&mut self, course: Course) {
        match self.courses.iter_mut().find(|row| row.id == course.id) {
            Some(row) => *row = course,
            None => self.courses.push(course),
        }
    }

    /// Deletes through the store, then drops the row locally.
    ///
    /// On failure the cached row is kept.
    pub fn delete<S: RecordStore>(
        &mut self,
        service: &CourseService<S>,
        id: RecordId,
    ) -> ServiceResult<bool> {
        self.loading = true;
        let result = service.delete(id);
        self.loading = false;
        let deleted = result?;

        if let Some(index) = self.courses.iter().position(|course| course.id == id) {
            let removed = self.courses.remove(index);
            service.notifier().notify(Notice::success(format!(
                "Course {} has been deleted",
                removed.course_id
            )));
        }
        Ok(deleted)
    }

    /// Term filter options derived from cached courses, led by `All Terms`.
    pub fn term_options(&self) -> Vec<SelectOption> {
        let terms = self
            .courses
            .iter()
            .map(|course| course.term.as_str())
            .filter(|term| !term.trim().is_empty() && *term != ALL)
            .collect::<BTreeSet<_>>();
        std::iter::once(SelectOption::all("All Terms"))
            .chain(terms.into_iter().map(|term| SelectOption::new(term, term)))
            .collect()
    }
}
