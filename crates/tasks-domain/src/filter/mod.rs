//! Task filtering functionality.
//!
//! Provides the predicate algebra and filter settings for deriving filtered
//! views of a task collection.

pub mod task_filters;
pub mod task_predicate;

pub use task_filters::TaskFilters;
pub use task_predicate::{apply, TaskFilter, TaskPredicate};
