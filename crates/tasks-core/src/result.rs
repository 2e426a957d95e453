use crate::error::TaskError;

pub type TaskResult<T> = Result<T, TaskError>;
