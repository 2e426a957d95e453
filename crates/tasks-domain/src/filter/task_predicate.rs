//! Task predicate combinators.
//!
//! Provides the TaskFilter trait and the TaskPredicate algebra: primitive
//! predicates over task attributes, closed under AND, OR and NOT.

use crate::{Task, TaskState};

/// Trait for filtering tasks by various criteria.
pub trait TaskFilter {
    /// Returns true if the task matches the filter criteria.
    fn matches(&self, task: &Task) -> bool;
}

impl<F> TaskFilter for F
where
    F: Fn(&Task) -> bool,
{
    fn matches(&self, task: &Task) -> bool {
        self(task)
    }
}

/// Keep the tasks matching `filter`, in order. The input is not touched.
pub fn apply<F>(tasks: &[Task], filter: &F) -> Vec<Task>
where
    F: TaskFilter + ?Sized,
{
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

/// A pure, reusable boolean predicate over a task.
///
/// Combinators consume their operands and return a new predicate; clone a
/// predicate first to keep using it on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPredicate {
    Always,
    Never,
    ByState(TaskState),
    /// Lowercased query matched against the lowercased title.
    TitleContains(String),
    /// Lowercased query matched against the lowercased description.
    DescriptionContains(String),
    And(Box<TaskPredicate>, Box<TaskPredicate>),
    Or(Box<TaskPredicate>, Box<TaskPredicate>),
    Not(Box<TaskPredicate>),
}

impl TaskPredicate {
    /// Matches every task. Identity for `and`, absorbing for `or`.
    pub fn all() -> Self {
        Self::Always
    }

    /// Matches no task.
    pub fn none() -> Self {
        Self::Never
    }

    pub fn by_state(state: TaskState) -> Self {
        Self::ByState(state)
    }

    /// Case-insensitive literal substring test on the title. An empty query
    /// matches every title.
    pub fn title_contains(query: impl AsRef<str>) -> Self {
        Self::TitleContains(query.as_ref().to_lowercase())
    }

    pub fn description_contains(query: impl AsRef<str>) -> Self {
        Self::DescriptionContains(query.as_ref().to_lowercase())
    }

    pub fn and(self, other: TaskPredicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: TaskPredicate) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// AND over every predicate; `all()` when empty.
    pub fn all_of(predicates: impl IntoIterator<Item = TaskPredicate>) -> Self {
        predicates
            .into_iter()
            .reduce(Self::and)
            .unwrap_or_else(Self::all)
    }

    /// OR over every predicate; `none()` when empty.
    pub fn any_of(predicates: impl IntoIterator<Item = TaskPredicate>) -> Self {
        predicates
            .into_iter()
            .reduce(Self::or)
            .unwrap_or_else(Self::none)
    }

    /// Evaluate left to right, short-circuiting like `&&` and `||`.
    pub fn test(&self, task: &Task) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::ByState(state) => task.state() == *state,
            Self::TitleContains(query) => task.title().to_lowercase().contains(query.as_str()),
            Self::DescriptionContains(query) => {
                task.description().to_lowercase().contains(query.as_str())
            }
            Self::And(left, right) => left.test(task) && right.test(task),
            Self::Or(left, right) => left.test(task) || right.test(task),
            Self::Not(inner) => !inner.test(task),
        }
    }

    /// New list of the matching tasks.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        apply(tasks, self)
    }
}

impl Default for TaskPredicate {
    fn default() -> Self {
        Self::all()
    }
}

impl TaskFilter for TaskPredicate {
    fn matches(&self, task: &Task) -> bool {
        self.test(task)
    }
}
