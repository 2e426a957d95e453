//! Task sorting functionality.
//!
//! Provides the sort fields and an order-aware sorter used by the service
//! and the CLI for consistent ordering.

use crate::Task;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;
use tasks_core::TaskError;

/// Enum dispatch for sorting tasks by a specific field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    Id,
    /// Case-insensitive title, then id.
    Title,
    /// Lifecycle order, then title, then id.
    State,
}

impl SortBy {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Title => title_key(a)
                .cmp(&title_key(b))
                .then_with(|| a.id().cmp(&b.id())),
            Self::State => a
                .state()
                .index()
                .cmp(&b.state().index())
                .then_with(|| title_key(a).cmp(&title_key(b)))
                .then_with(|| a.id().cmp(&b.id())),
        }
    }
}

impl FromStr for SortBy {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "default" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "state" | "status" => Ok(Self::State),
            other => Err(TaskError::Config(format!("unknown sort field: '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Wrapper that applies sort order (ascending/descending) to a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderedSorter {
    sorter: SortBy,
    order: SortOrder,
}

impl OrderedSorter {
    pub fn new(sorter: SortBy, order: SortOrder) -> Self {
        Self { sorter, order }
    }

    pub fn sort_field(&self) -> SortBy {
        self.sorter
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Sort a slice in place. Works with both `&Task` and `Task` elements.
    pub fn sort_by<T: Borrow<Task>>(&self, tasks: &mut [T]) {
        tasks.sort_by(|a, b| {
            let cmp = self.sorter.compare(a.borrow(), b.borrow());
            match self.order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        });
    }

    /// Sorted copy; the input keeps its order.
    pub fn sorted(&self, tasks: &[Task]) -> Vec<Task> {
        let mut copy = tasks.to_vec();
        self.sort_by(&mut copy);
        copy
    }
}

fn title_key(task: &Task) -> String {
    task.title().to_lowercase()
}
