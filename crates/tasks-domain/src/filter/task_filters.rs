//! Task filter configuration.
//!
//! Provides the TaskFilters struct which holds filter settings for querying
//! tasks, as opposed to the TaskPredicate algebra that performs the actual
//! filtering.

use super::TaskPredicate;
use crate::TaskState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    /// Filter to tasks in this state.
    pub state: Option<TaskState>,
    /// Filter to tasks whose title contains this text.
    pub title_query: Option<String>,
    /// Filter to tasks whose description contains this text.
    pub description_query: Option<String>,
}

impl TaskFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank queries do not count as active.
    pub fn has_active_filters(&self) -> bool {
        self.state.is_some()
            || active_query(&self.title_query).is_some()
            || active_query(&self.description_query).is_some()
    }

    pub fn clear(&mut self) {
        self.state = None;
        self.title_query = None;
        self.description_query = None;
    }

    /// Combine the active settings with AND. Blank queries match everything.
    pub fn to_predicate(&self) -> TaskPredicate {
        let mut parts = Vec::new();
        if let Some(state) = self.state {
            parts.push(TaskPredicate::by_state(state));
        }
        if let Some(query) = active_query(&self.title_query) {
            parts.push(TaskPredicate::title_contains(query));
        }
        if let Some(query) = active_query(&self.description_query) {
            parts.push(TaskPredicate::description_contains(query));
        }
        TaskPredicate::all_of(parts)
    }
}

fn active_query(query: &Option<String>) -> Option<&str> {
    query
        .as_deref()
        .map(str::trim)
        .filter(|query| !query.is_empty())
}
