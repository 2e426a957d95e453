use crate::{Task, TaskId, TaskRepository};
use tasks_core::{TaskError, TaskResult};

pub mod task_commands;
pub mod transition;

pub use task_commands::*;
pub use transition::*;

/// A unit of work with a forward action and a matching inverse.
///
/// Commands are pure data/transition units: each step returns the
/// [`TaskChange`] the caller must persist and never touches storage itself.
pub trait ReversibleCommand {
    /// Perform the forward action.
    fn execute(&mut self) -> TaskResult<TaskChange>;

    /// Revert the last successful `execute`.
    fn undo(&mut self) -> TaskResult<TaskChange>;

    /// Replay the forward action after an undo.
    fn redo(&mut self) -> TaskResult<TaskChange> {
        self.execute()
    }

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// A persistence instruction produced by a command step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Insert(Task),
    Update(Task),
    Remove(TaskId),
}

impl TaskChange {
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Insert(task) | Self::Update(task) => task.id(),
            Self::Remove(id) => *id,
        }
    }

    /// Route this change to the matching repository call.
    pub fn apply_to<R>(&self, repository: &mut R) -> TaskResult<()>
    where
        R: TaskRepository + ?Sized,
    {
        match self {
            Self::Insert(task) => repository.add_task(task.clone()),
            Self::Update(task) => repository.update_task(task.clone()),
            Self::Remove(id) => repository.delete_task(*id),
        }
    }
}

pub(crate) fn not_executed(description: String) -> TaskError {
    TaskError::IllegalState(format!("'{}' has not been executed", description))
}
