use serde::{Deserialize, Serialize};
use tasks_core::{TaskResult, ValidationError};

use crate::task_lifecycle::TaskState;

pub type TaskId = u32;

/// An immutable task value.
///
/// Updates never touch an existing value; `with_*` methods return a new
/// task carrying the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    state: TaskState,
}

/// Unvalidated wire shape of a task.
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    state: Option<TaskState>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Self::build(record.id, record.title, record.description, record.state)
    }
}

impl Task {
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        state: TaskState,
    ) -> TaskResult<Self> {
        Self::try_new(id, title, description, Some(state))
    }

    /// Like [`Task::new`] for callers whose state may be absent, such as
    /// parsed input. A missing state is a validation error.
    pub fn try_new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        state: Option<TaskState>,
    ) -> TaskResult<Self> {
        Ok(Self::build(id, title.into(), description.into(), state)?)
    }

    fn build(
        id: TaskId,
        title: String,
        description: String,
        state: Option<TaskState>,
    ) -> Result<Self, ValidationError> {
        let title = Self::validate_title(&title)?;
        let state = state.ok_or(ValidationError::MissingState)?;
        Ok(Self {
            id,
            title,
            description,
            state,
        })
    }

    fn validate_title(title: &str) -> Result<String, ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(trimmed.to_string())
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// New value in `state`, provided the lifecycle allows the move.
    pub fn with_state(&self, state: TaskState) -> TaskResult<Self> {
        self.state.validate_transition(state)?;
        Ok(Self {
            state,
            ..self.clone()
        })
    }

    pub fn try_with_state(&self, state: Option<TaskState>) -> TaskResult<Self> {
        let state = state.ok_or(ValidationError::MissingState)?;
        self.with_state(state)
    }

    pub fn with_title(&self, title: impl Into<String>) -> TaskResult<Self> {
        let title = Self::validate_title(&title.into())?;
        Ok(Self {
            title,
            ..self.clone()
        })
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_core::TaskError;

    fn todo_task() -> Task {
        Task::new(501, "Write report", "quarterly numbers", TaskState::ToDo).unwrap()
    }

    fn assert_validation(result: TaskResult<Task>, expected: ValidationError) {
        match result {
            Err(TaskError::Validation(err)) => assert_eq!(err, expected),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_trims_title() {
        let task = Task::new(1, "  Buy milk  ", "", TaskState::ToDo).unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "");
        assert_eq!(task.state(), TaskState::ToDo);
    }

    #[test]
    fn test_blank_title_rejected() {
        assert_validation(
            Task::new(1, "   ", "desc", TaskState::ToDo),
            ValidationError::EmptyTitle,
        );
        assert_validation(
            Task::new(1, "", "desc", TaskState::ToDo),
            ValidationError::EmptyTitle,
        );
    }

    #[test]
    fn test_missing_state_rejected_on_construction() {
        assert_validation(
            Task::try_new(1, "Title", "", None),
            ValidationError::MissingState,
        );
    }

    #[test]
    fn test_missing_state_rejected_from_every_state() {
        for state in TaskState::all() {
            let task = Task::new(1, "Title", "", state).unwrap();
            assert_validation(task.try_with_state(None), ValidationError::MissingState);
        }
    }

    #[test]
    fn test_forward_chain_one_step_at_a_time() {
        let todo = todo_task();
        let in_progress = todo.with_state(TaskState::InProgress).unwrap();
        let completed = in_progress.with_state(TaskState::Completed).unwrap();

        assert_eq!(completed.state(), TaskState::Completed);
        assert_eq!(completed.id(), 501);
        assert_eq!(todo.state(), TaskState::ToDo);
    }

    #[test]
    fn test_backward_transition_rejected_without_mutation() {
        let completed = todo_task()
            .with_state(TaskState::Completed)
            .unwrap();

        assert_validation(
            completed.with_state(TaskState::InProgress),
            ValidationError::IllegalTransition {
                from: "Completed".to_string(),
                to: "InProgress".to_string(),
            },
        );
        assert_eq!(completed.state(), TaskState::Completed);
    }

    #[test]
    fn test_same_state_is_idempotent() {
        for state in TaskState::all() {
            let task = Task::new(7, "Same", "", state).unwrap();
            assert_eq!(task.with_state(state).unwrap(), task);
        }
    }

    #[test]
    fn test_with_title_and_description() {
        let task = todo_task();
        let renamed = task.with_title(" Final report ").unwrap();
        assert_eq!(renamed.title(), "Final report");
        assert_eq!(task.title(), "Write report");

        assert!(task.with_title(" ").is_err());

        let described = task.with_description("annual");
        assert_eq!(described.description(), "annual");
        assert_eq!(described.id(), task.id());
    }

    #[test]
    fn test_serde_round_trip() {
        let task = todo_task();
        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_deserialize_validates() {
        let blank = r#"{"id": 1, "title": " ", "description": "", "state": "ToDo"}"#;
        assert!(serde_json::from_str::<Task>(blank).is_err());

        let stateless = r#"{"id": 1, "title": "Ok", "description": ""}"#;
        assert!(serde_json::from_str::<Task>(stateless).is_err());
    }
}
