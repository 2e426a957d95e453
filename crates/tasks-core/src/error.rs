use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }
}

/// Domain rule violations, raised synchronously by the call that broke them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("illegal state transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("title must be non-empty")]
    EmptyTitle,

    #[error("state must be provided")]
    MissingState,

    #[error("unknown state: '{0}'")]
    UnknownState(String),

    #[error("task {0} already exists")]
    DuplicateId(u32),

    #[error("task id mismatch: expected {expected}, found {found}")]
    IdMismatch { expected: u32, found: u32 },
}
