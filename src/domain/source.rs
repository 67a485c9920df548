use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::TaskError;

/// Backing store a read or write is routed to. Remote is always consulted
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Remote,
    Local,
}

impl Source {
    pub const PRIMARY: Source = Source::Remote;

    /// Store to retry against after `err` came back from `self`, if any.
    /// Only an unavailable remote is recoverable.
    pub fn fallback_for(self, err: &TaskError) -> Option<Source> {
        match (self, err) {
            (Source::Remote, TaskError::SourceUnavailable { .. }) => Some(Source::Local),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Source::Remote => "remote", Source::Local => "local" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskId;

    #[test]
    fn only_unavailable_remote_falls_back() {
        let down = TaskError::unavailable(Source::Remote, "offline");
        assert_eq!(Source::Remote.fallback_for(&down), Some(Source::Local));
        assert_eq!(Source::Local.fallback_for(&down), None);
        assert_eq!(Source::Remote.fallback_for(&TaskError::NotFound(TaskId::from("1"))), None);
        assert_eq!(Source::Remote.fallback_for(&TaskError::Unknown("boom".into())), None);
    }
}
