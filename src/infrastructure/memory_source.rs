use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    data_source::TasksDataSource,
    error::TaskError,
    outcome::Outcome,
    source::Source,
    task::{Task, TaskId},
};

/// Insertion-ordered in-memory store. Serves as the remote service in the
/// binary and as a controllable fake in tests: it can be slowed down with a
/// fixed latency or taken offline.
pub struct InMemoryTasksDataSource {
    origin: Source,
    tasks: Mutex<Vec<Task>>,
    latency: Duration,
    available: AtomicBool,
    reads: AtomicU64,
}

impl InMemoryTasksDataSource {
    pub fn new(origin: Source) -> Self {
        Self {
            origin,
            tasks: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            available: AtomicBool::new(true),
            reads: AtomicU64::new(0),
        }
    }

    pub fn with_tasks(origin: Source, tasks: Vec<Task>) -> Self {
        Self { tasks: Mutex::new(tasks), ..Self::new(origin) }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_available(&self, available: bool) { self.available.store(available, Ordering::SeqCst); }

    /// Number of `get_tasks`/`get_task` calls served so far.
    pub fn reads(&self) -> u64 { self.reads.load(Ordering::SeqCst) }

    /// Current contents, bypassing latency and availability.
    pub async fn snapshot(&self) -> Vec<Task> { self.tasks.lock().await.clone() }

    async fn enter(&self) -> Result<(), TaskError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TaskError::unavailable(self.origin, "service offline"))
        }
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), TaskError> {
        self.enter().await?;
        let mut tasks = self.tasks.lock().await;
        if let Some(task) = tasks.iter_mut().find(|t| t.id == *id) {
            *task = Task { is_completed: completed, ..task.clone() };
        }
        Ok(())
    }
}

#[async_trait]
impl TasksDataSource for InMemoryTasksDataSource {
    async fn get_tasks(&self) -> Outcome<Vec<Task>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.enter().await {
            return Outcome::Error(err);
        }
        Outcome::Success(self.tasks.lock().await.clone())
    }

    async fn get_task(&self, id: &TaskId) -> Outcome<Task> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.enter().await {
            return Outcome::Error(err);
        }
        match self.tasks.lock().await.iter().find(|t| t.id == *id) {
            Some(task) => Outcome::Success(task.clone()),
            None => Outcome::Error(TaskError::NotFound(id.clone())),
        }
    }

    async fn save_task(&self, task: &Task) -> Result<(), TaskError> {
        self.enter().await?;
        let mut tasks = self.tasks.lock().await;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        Ok(())
    }

    async fn complete_task(&self, id: &TaskId) -> Result<(), TaskError> { self.set_completed(id, true).await }

    async fn activate_task(&self, id: &TaskId) -> Result<(), TaskError> { self.set_completed(id, false).await }

    async fn clear_completed_tasks(&self) -> Result<(), TaskError> {
        self.enter().await?;
        self.tasks.lock().await.retain(|t| t.is_active());
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<(), TaskError> {
        self.enter().await?;
        self.tasks.lock().await.clear();
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
        self.enter().await?;
        self.tasks.lock().await.retain(|t| t.id != *id);
        Ok(())
    }

    async fn replace_all(&self, tasks: &[Task]) -> Result<(), TaskError> {
        self.enter().await?;
        *self.tasks.lock().await = tasks.to_vec();
        Ok(())
    }
}
