//! Task lifecycle rules.
//!
//! A task moves forward through `ToDo -> InProgress -> Completed`. Staying in
//! the same state is always allowed; moving to an earlier state never is.
//! The only way back is command-level undo, which restores a value that was
//! legally reached before.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tasks_core::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskState {
    ToDo,
    InProgress,
    Completed,
}

impl TaskState {
    /// Position in the lifecycle order.
    pub fn index(self) -> u8 {
        match self {
            Self::ToDo => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }

    /// Every state, in lifecycle order.
    pub fn all() -> [TaskState; 3] {
        [Self::ToDo, Self::InProgress, Self::Completed]
    }

    /// The state one step forward, `None` once completed.
    pub fn next(self) -> Option<TaskState> {
        match self {
            Self::ToDo => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// `true` iff `to` is not earlier than `from`.
    pub fn can_transition(from: TaskState, to: TaskState) -> bool {
        to.index() >= from.index()
    }

    pub fn can_transition_to(self, target: TaskState) -> bool {
        Self::can_transition(self, target)
    }

    /// Check a transition, reporting the attempted pair on failure.
    pub fn validate_transition(self, target: TaskState) -> Result<(), ValidationError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(ValidationError::IllegalTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "ToDo",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "" => Err(ValidationError::MissingState),
            "todo" => Ok(Self::ToDo),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ValidationError::UnknownState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_transition_matches_index_order_for_every_pair() {
        for from in TaskState::all() {
            for to in TaskState::all() {
                assert_eq!(
                    TaskState::can_transition(from, to),
                    to.index() >= from.index(),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(TaskState::ToDo.can_transition_to(TaskState::InProgress));
        assert!(TaskState::InProgress.can_transition_to(TaskState::Completed));
        assert!(TaskState::ToDo.can_transition_to(TaskState::Completed));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        let backward = [
            (TaskState::InProgress, TaskState::ToDo),
            (TaskState::Completed, TaskState::InProgress),
            (TaskState::Completed, TaskState::ToDo),
        ];
        for (from, to) in backward {
            assert_eq!(
                from.validate_transition(to),
                Err(ValidationError::IllegalTransition {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_same_state_is_allowed() {
        for state in TaskState::all() {
            assert!(state.validate_transition(state).is_ok());
        }
    }

    #[test]
    fn test_next() {
        assert_eq!(TaskState::ToDo.next(), Some(TaskState::InProgress));
        assert_eq!(TaskState::InProgress.next(), Some(TaskState::Completed));
        assert_eq!(TaskState::Completed.next(), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("todo".parse::<TaskState>(), Ok(TaskState::ToDo));
        assert_eq!("To-Do".parse::<TaskState>(), Ok(TaskState::ToDo));
        assert_eq!("in-progress".parse::<TaskState>(), Ok(TaskState::InProgress));
        assert_eq!("InProgress".parse::<TaskState>(), Ok(TaskState::InProgress));
        assert_eq!("done".parse::<TaskState>(), Ok(TaskState::Completed));
        assert_eq!("  ".parse::<TaskState>(), Err(ValidationError::MissingState));
        assert_eq!(
            "blocked".parse::<TaskState>(),
            Err(ValidationError::UnknownState("blocked".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for state in TaskState::all() {
            assert_eq!(state.to_string().parse::<TaskState>(), Ok(state));
        }
    }
}
