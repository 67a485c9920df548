use super::error::TaskError;

/// Result of a read against a repository or data source.
///
/// Errors travel as values so observers can render a failure state instead
/// of handling a `Result` at every call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Error(TaskError),
    Loading,
}

impl<T> Outcome<T> {
    pub fn succeeded(&self) -> bool { matches!(self, Outcome::Success(_)) }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(data) => Outcome::Success(f(data)),
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Loading => Outcome::Loading,
        }
    }

    /// Collapses `Loading` into an `Unknown` error for callers that need a
    /// settled answer.
    pub fn into_result(self) -> Result<T, TaskError> {
        match self {
            Outcome::Success(data) => Ok(data),
            Outcome::Error(err) => Err(err),
            Outcome::Loading => Err(TaskError::Unknown("still loading".into())),
        }
    }
}

impl<T> From<Result<T, TaskError>> for Outcome<T> {
    fn from(result: Result<T, TaskError>) -> Self {
        match result {
            Ok(data) => Outcome::Success(data),
            Err(err) => Outcome::Error(err),
        }
    }
}
