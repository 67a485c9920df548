use thiserror::Error;

use super::source::Source;
use super::task::TaskId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("{origin} data source unavailable: {message}")]
    SourceUnavailable { origin: Source, message: String },

    #[error("Invalid task: {0}")]
    Invalid(String),

    #[error("{0}")]
    Unknown(String),
}

impl TaskError {
    pub fn unavailable(origin: Source, message: impl Into<String>) -> Self {
        Self::SourceUnavailable { origin, message: message.into() }
    }
}
