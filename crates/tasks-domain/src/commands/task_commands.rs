use super::{not_executed, ReversibleCommand, TaskChange};
use crate::Task;
use tasks_core::{TaskResult, ValidationError};

/// Add a task; undo removes it again.
pub struct AddTask {
    task: Task,
    executed: bool,
}

impl AddTask {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            executed: false,
        }
    }
}

impl ReversibleCommand for AddTask {
    fn execute(&mut self) -> TaskResult<TaskChange> {
        self.executed = true;
        Ok(TaskChange::Insert(self.task.clone()))
    }

    fn undo(&mut self) -> TaskResult<TaskChange> {
        if !self.executed {
            return Err(not_executed(self.description()));
        }
        Ok(TaskChange::Remove(self.task.id()))
    }

    fn description(&self) -> String {
        format!("Add task: '{}'", self.task.title())
    }
}

/// Replace a task with an edited value; undo restores the original.
///
/// The edit must keep the id and may only move the state forward.
pub struct UpdateTask {
    before: Task,
    after: Task,
    executed: bool,
}

impl UpdateTask {
    pub fn new(before: Task, after: Task) -> Self {
        Self {
            before,
            after,
            executed: false,
        }
    }
}

impl ReversibleCommand for UpdateTask {
    fn execute(&mut self) -> TaskResult<TaskChange> {
        if self.before.id() != self.after.id() {
            return Err(ValidationError::IdMismatch {
                expected: self.before.id(),
                found: self.after.id(),
            }
            .into());
        }
        self.before.state().validate_transition(self.after.state())?;

        self.executed = true;
        Ok(TaskChange::Update(self.after.clone()))
    }

    fn undo(&mut self) -> TaskResult<TaskChange> {
        if !self.executed {
            return Err(not_executed(self.description()));
        }
        Ok(TaskChange::Update(self.before.clone()))
    }

    fn description(&self) -> String {
        format!("Update task {}", self.before.id())
    }
}

/// Delete a task; undo re-inserts the deleted snapshot.
pub struct DeleteTask {
    snapshot: Task,
    executed: bool,
}

impl DeleteTask {
    pub fn new(snapshot: Task) -> Self {
        Self {
            snapshot,
            executed: false,
        }
    }
}

impl ReversibleCommand for DeleteTask {
    fn execute(&mut self) -> TaskResult<TaskChange> {
        self.executed = true;
        Ok(TaskChange::Remove(self.snapshot.id()))
    }

    fn undo(&mut self) -> TaskResult<TaskChange> {
        if !self.executed {
            return Err(not_executed(self.description()));
        }
        Ok(TaskChange::Insert(self.snapshot.clone()))
    }

    fn description(&self) -> String {
        format!("Delete task {}", self.snapshot.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskState;
    use tasks_core::TaskError;

    fn task(id: u32, state: TaskState) -> Task {
        Task::new(id, "Title", "", state).unwrap()
    }

    #[test]
    fn test_add_task_round_trip() {
        let mut command = AddTask::new(task(1, TaskState::ToDo));

        assert!(command.undo().unwrap_err().is_illegal_state());
        assert_eq!(
            command.execute().unwrap(),
            TaskChange::Insert(task(1, TaskState::ToDo))
        );
        assert_eq!(command.undo().unwrap(), TaskChange::Remove(1));
        assert_eq!(
            command.redo().unwrap(),
            TaskChange::Insert(task(1, TaskState::ToDo))
        );
        assert_eq!(command.description(), "Add task: 'Title'");
    }

    #[test]
    fn test_update_task_forward_edit() {
        let before = task(2, TaskState::ToDo);
        let after = before
            .with_title("Renamed")
            .unwrap()
            .with_state(TaskState::InProgress)
            .unwrap();
        let mut command = UpdateTask::new(before.clone(), after.clone());

        assert_eq!(command.execute().unwrap(), TaskChange::Update(after));
        assert_eq!(command.undo().unwrap(), TaskChange::Update(before));
    }

    #[test]
    fn test_update_task_rejects_backward_state() {
        let before = task(2, TaskState::Completed);
        let after = task(2, TaskState::ToDo);
        let mut command = UpdateTask::new(before, after);

        let err = command.execute().unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::IllegalTransition { .. })
        ));
        assert!(command.undo().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_update_task_rejects_id_change() {
        let mut command = UpdateTask::new(task(2, TaskState::ToDo), task(3, TaskState::ToDo));
        let err = command.execute().unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::IdMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_delete_task_round_trip() {
        let snapshot = task(4, TaskState::InProgress);
        let mut command = DeleteTask::new(snapshot.clone());

        assert_eq!(command.execute().unwrap(), TaskChange::Remove(4));
        assert_eq!(command.undo().unwrap(), TaskChange::Insert(snapshot));
        assert_eq!(command.description(), "Delete task 4");
    }
}
