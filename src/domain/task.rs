use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl Default for TaskId {
    fn default() -> Self { Self(Uuid::new_v4().to_string()) }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

/// A to-do item. Values are immutable: completing or activating a task
/// yields a new `Task` with the same id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: TaskId::default(), title: title.into(), description: description.into(), is_completed: false }
    }

    pub fn with_id(id: TaskId, title: impl Into<String>, description: impl Into<String>, is_completed: bool) -> Self {
        Self { id, title: title.into(), description: description.into(), is_completed }
    }

    pub fn is_active(&self) -> bool { !self.is_completed }

    pub fn is_empty(&self) -> bool { self.title.is_empty() && self.description.is_empty() }

    pub fn completed(&self) -> Self { Self { is_completed: true, ..self.clone() } }

    pub fn activated(&self) -> Self { Self { is_completed: false, ..self.clone() } }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
}
