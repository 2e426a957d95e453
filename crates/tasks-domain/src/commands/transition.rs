use super::{not_executed, ReversibleCommand, TaskChange};
use crate::{Task, TaskState};
use tasks_core::{TaskResult, ValidationError};

/// Produces the next task value for a target state.
pub type StateMutator = fn(&Task, TaskState) -> TaskResult<Task>;

/// Move one task to a target state.
///
/// Construction performs no validation; the mutator runs on `execute` and
/// its validation error propagates unchanged. Undo hands back the value
/// held before execute, which was itself legally reached, so undo never
/// fails on the lifecycle rules.
pub struct TransitionState<F = StateMutator> {
    snapshot: Task,
    target: TaskState,
    mutator: F,
    previous: Option<Task>,
    applied: Option<Task>,
}

impl TransitionState {
    /// Transition using [`Task::with_state`].
    pub fn new(snapshot: Task, target: TaskState) -> Self {
        Self::with_mutator(snapshot, target, Task::with_state as StateMutator)
    }
}

impl<F> TransitionState<F>
where
    F: Fn(&Task, TaskState) -> TaskResult<Task>,
{
    pub fn with_mutator(snapshot: Task, target: TaskState, mutator: F) -> Self {
        Self {
            snapshot,
            target,
            mutator,
            previous: None,
            applied: None,
        }
    }

    pub fn target(&self) -> TaskState {
        self.target
    }

    pub fn previous(&self) -> Option<&Task> {
        self.previous.as_ref()
    }

    pub fn applied(&self) -> Option<&Task> {
        self.applied.as_ref()
    }
}

impl<F> ReversibleCommand for TransitionState<F>
where
    F: Fn(&Task, TaskState) -> TaskResult<Task>,
{
    fn execute(&mut self) -> TaskResult<TaskChange> {
        let next = (self.mutator)(&self.snapshot, self.target)?;
        if next.id() != self.snapshot.id() {
            return Err(ValidationError::IdMismatch {
                expected: self.snapshot.id(),
                found: next.id(),
            }
            .into());
        }

        self.previous = Some(self.snapshot.clone());
        self.applied = Some(next.clone());
        Ok(TaskChange::Update(next))
    }

    fn undo(&mut self) -> TaskResult<TaskChange> {
        match &self.previous {
            Some(previous) => Ok(TaskChange::Update(previous.clone())),
            None => Err(not_executed(self.description())),
        }
    }

    fn redo(&mut self) -> TaskResult<TaskChange> {
        match &self.applied {
            Some(applied) => Ok(TaskChange::Update(applied.clone())),
            None => Err(not_executed(self.description())),
        }
    }

    fn description(&self) -> String {
        format!("Mark task {} as {}", self.snapshot.id(), self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tasks_core::TaskError;

    fn task(state: TaskState) -> Task {
        Task::new(501, "Ship release", "", state).unwrap()
    }

    #[test]
    fn test_execute_returns_updated_task() {
        let mut command = TransitionState::new(task(TaskState::ToDo), TaskState::InProgress);

        let change = command.execute().unwrap();

        assert_eq!(change, TaskChange::Update(task(TaskState::InProgress)));
        assert_eq!(command.previous(), Some(&task(TaskState::ToDo)));
        assert_eq!(command.applied(), Some(&task(TaskState::InProgress)));
    }

    #[test]
    fn test_construction_does_not_validate() {
        let mut command = TransitionState::new(task(TaskState::Completed), TaskState::ToDo);
        assert_eq!(command.target(), TaskState::ToDo);

        let err = command.execute().unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::IllegalTransition { .. })
        ));
        assert!(command.previous().is_none());
        assert!(command.applied().is_none());
    }

    #[test]
    fn test_undo_restores_previous_even_when_backward() {
        let mut command = TransitionState::new(task(TaskState::InProgress), TaskState::Completed);
        command.execute().unwrap();

        let change = command.undo().unwrap();
        assert_eq!(change, TaskChange::Update(task(TaskState::InProgress)));
    }

    #[test]
    fn test_redo_replays_applied_value() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut command = TransitionState::with_mutator(
            task(TaskState::ToDo),
            TaskState::InProgress,
            move |task: &Task, state: TaskState| {
                counter.set(counter.get() + 1);
                task.with_state(state)
            },
        );

        command.execute().unwrap();
        command.undo().unwrap();
        let change = command.redo().unwrap();

        assert_eq!(change, TaskChange::Update(task(TaskState::InProgress)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_undo_and_redo_before_execute_are_illegal_state() {
        let mut command = TransitionState::new(task(TaskState::ToDo), TaskState::InProgress);
        assert!(command.undo().unwrap_err().is_illegal_state());
        assert!(command.redo().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_mutator_changing_id_is_rejected() {
        let mut command = TransitionState::with_mutator(
            task(TaskState::ToDo),
            TaskState::InProgress,
            |task: &Task, state: TaskState| Task::new(task.id() + 1, task.title(), "", state),
        );

        let err = command.execute().unwrap_err();
        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::IdMismatch {
                expected: 501,
                found: 502
            })
        ));
    }

    #[test]
    fn test_description() {
        let command = TransitionState::new(task(TaskState::ToDo), TaskState::Completed);
        assert_eq!(command.description(), "Mark task 501 as Completed");
    }
}
