use async_trait::async_trait;

use super::{
    error::TaskError,
    outcome::Outcome,
    task::{Task, TaskId},
};

/// CRUD surface shared by the remote and local stores. Writes addressing an
/// absent id are no-ops.
#[async_trait]
pub trait TasksDataSource: Send + Sync + 'static {
    async fn get_tasks(&self) -> Outcome<Vec<Task>>;
    async fn get_task(&self, id: &TaskId) -> Outcome<Task>;
    /// Inserts or replaces by id.
    async fn save_task(&self, task: &Task) -> Result<(), TaskError>;
    async fn complete_task(&self, id: &TaskId) -> Result<(), TaskError>;
    async fn activate_task(&self, id: &TaskId) -> Result<(), TaskError>;
    async fn clear_completed_tasks(&self) -> Result<(), TaskError>;
    async fn delete_all_tasks(&self) -> Result<(), TaskError>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError>;
    /// Swaps the whole contents for `tasks`, keeping their order. Either all
    /// of it lands or the store is left as it was.
    async fn replace_all(&self, tasks: &[Task]) -> Result<(), TaskError>;
}
