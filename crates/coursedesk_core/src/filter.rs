//! Search and category filter semantics shared by views and services.
//!
//! # Invariants
//! - A category value of `"All"` (or blank) adds no constraint.
//! - Text search is a case-insensitive substring match OR'd across fields.
//! - Combined filters evaluate as `(search) AND (category) AND (term)`.

use crate::model::course::{Course, COURSE_FIELD_DEPARTMENT, COURSE_FIELD_TERM};
use crate::model::schema::RecordFilter;
use crate::store::query::{Condition, FetchQuery, WhereGroup};

/// Sentinel category value meaning "no constraint".
pub const ALL: &str = "All";

/// Returns whether a category selection leaves the field unconstrained.
pub fn is_all(selected: &str) -> bool {
    let selected = selected.trim();
    selected.is_empty() || selected == ALL
}

/// Local category match using sentinel semantics.
pub fn category_matches(selected: &str, value: &str) -> bool {
    is_all(selected) || value == selected.trim()
}

/// Local case-insensitive search across candidate values.
///
/// A blank search matches everything.
pub fn text_matches(search: &str, candidates: &[&str]) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    candidates
        .iter()
        .any(|candidate| candidate.to_lowercase().contains(needle.as_str()))
}

/// Store-side OR group of `Contains` conditions, or `None` for a blank search.
pub fn search_group(search: &str, fields: &[&str]) -> Option<WhereGroup> {
    let needle = search.trim();
    if needle.is_empty() {
        return None;
    }
    Some(WhereGroup::any(
        fields
            .iter()
            .map(|field| Condition::contains(*field, needle))
            .collect(),
    ))
}

/// Store-side exact-match condition, or `None` for the sentinel.
pub fn category_condition(field: &str, selected: &str) -> Option<Condition> {
    if is_all(selected) {
        return None;
    }
    Some(Condition::exact(field, selected.trim()))
}

/// Course list filter: free-text search plus department and term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFilter {
    pub search: String,
    pub department: String,
    pub term: String,
}

impl Default for CourseFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            department: ALL.to_string(),
            term: ALL.to_string(),
        }
    }
}

impl CourseFilter {
    /// Fields searched by free text, in store naming.
    pub const SEARCH_FIELDS: [&'static str; 3] = ["Name", "course_id", "instructor"];

    pub fn new(
        search: impl Into<String>,
        department: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            department: department.into(),
            term: term.into(),
        }
    }

    /// Restores `search = ""`, `department = "All"`, `term = "All"`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        self.search.trim().is_empty() && is_all(&self.department) && is_all(&self.term)
    }

    /// Local evaluation against an already-fetched course.
    pub fn matches(&self, course: &Course) -> bool {
        text_matches(
            &self.search,
            &[
                course.course_id.as_str(),
                course.name.as_str(),
                course.instructor.as_str(),
            ],
        ) && category_matches(&self.department, &course.department)
            && category_matches(&self.term, &course.term)
    }
}

impl RecordFilter for CourseFilter {
    fn apply(&self, query: &mut FetchQuery) {
        query.where_conditions.extend(
            [
                category_condition(COURSE_FIELD_DEPARTMENT, &self.department),
                category_condition(COURSE_FIELD_TERM, &self.term),
            ]
            .into_iter()
            .flatten(),
        );
        if let Some(group) = search_group(&self.search, &Self::SEARCH_FIELDS) {
            query.where_groups.push(group);
        }
    }
}
