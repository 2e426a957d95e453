//! Persistence port.
//!
//! The command and history layers never store anything themselves. Whoever
//! coordinates them hands the resulting changes to a `TaskRepository`.

use crate::{Task, TaskId};
use tasks_core::TaskResult;

#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// All tasks, in storage order.
    fn tasks(&self) -> TaskResult<Vec<Task>>;

    /// Fails with `TaskError::NotFound` when no task has this id.
    fn task(&self, id: TaskId) -> TaskResult<Task>;

    /// Fails with `ValidationError::DuplicateId` when the id is taken.
    fn add_task(&mut self, task: Task) -> TaskResult<()>;

    /// Replace the stored task with the same id.
    fn update_task(&mut self, task: Task) -> TaskResult<()>;

    fn delete_task(&mut self, id: TaskId) -> TaskResult<()>;

    fn delete_all_tasks(&mut self) -> TaskResult<()>;
}
