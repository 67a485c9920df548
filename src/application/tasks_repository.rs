//! Repository facade over a remote and a local task store.
//!
//! Reads go to the remote first; an unavailable remote falls back to the
//! local store. A successful remote load replaces the local contents and
//! becomes the in-memory snapshot served to later reads until a mutation
//! invalidates it.

use async_trait::async_trait;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::domain::{
    data_source::TasksDataSource,
    error::TaskError,
    outcome::Outcome,
    source::Source,
    task::{Task, TaskId},
};

#[async_trait]
pub trait TasksRepository: Send + Sync + 'static {
    async fn get_tasks(&self, force_update: bool) -> Outcome<Vec<Task>>;
    async fn refresh_tasks(&self);
    async fn observe_tasks(&self) -> watch::Receiver<Outcome<Vec<Task>>>;
    async fn get_task(&self, id: &TaskId, force_update: bool) -> Outcome<Task>;
    async fn refresh_task(&self, id: &TaskId);
    async fn observe_task(&self, id: &TaskId) -> TaskObserver;
    async fn save_task(&self, task: &Task) -> Result<(), TaskError>;
    async fn complete_task(&self, task: &Task) -> Result<(), TaskError>;
    async fn complete_task_by_id(&self, id: &TaskId) -> Result<(), TaskError>;
    async fn activate_task(&self, task: &Task) -> Result<(), TaskError>;
    async fn activate_task_by_id(&self, id: &TaskId) -> Result<(), TaskError>;
    async fn clear_completed_tasks(&self) -> Result<(), TaskError>;
    async fn delete_all_tasks(&self) -> Result<(), TaskError>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError>;
}

/// Follows the published task list and projects it onto a single id.
pub struct TaskObserver {
    id: TaskId,
    tasks: watch::Receiver<Outcome<Vec<Task>>>,
}

impl TaskObserver {
    pub fn new(id: TaskId, tasks: watch::Receiver<Outcome<Vec<Task>>>) -> Self { Self { id, tasks } }

    pub fn current(&self) -> Outcome<Task> {
        match &*self.tasks.borrow() {
            Outcome::Success(tasks) => match tasks.iter().find(|t| t.id == self.id) {
                Some(task) => Outcome::Success(task.clone()),
                None => Outcome::Error(TaskError::NotFound(self.id.clone())),
            },
            Outcome::Error(err) => Outcome::Error(err.clone()),
            Outcome::Loading => Outcome::Loading,
        }
    }

    /// Waits for the next publish and returns the projected value.
    pub async fn changed(&mut self) -> Result<Outcome<Task>, watch::error::RecvError> {
        self.tasks.changed().await?;
        Ok(self.current())
    }
}

type Cache<'a> = MutexGuard<'a, Option<Vec<Task>>>;

pub struct DefaultTasksRepository<R: TasksDataSource, L: TasksDataSource> {
    remote: R,
    local: L,
    cache: Mutex<Option<Vec<Task>>>,
    published: watch::Sender<Outcome<Vec<Task>>>,
}

impl<R: TasksDataSource, L: TasksDataSource> DefaultTasksRepository<R, L> {
    pub fn new(remote: R, local: L) -> Self {
        let (published, _) = watch::channel(Outcome::Loading);
        Self { remote, local, cache: Mutex::new(None), published }
    }

    pub fn remote(&self) -> &R { &self.remote }

    pub fn local(&self) -> &L { &self.local }

    fn source(&self, source: Source) -> &dyn TasksDataSource {
        match source {
            Source::Remote => &self.remote,
            Source::Local => &self.local,
        }
    }

    async fn load_tasks(&self, cache: &mut Option<Vec<Task>>, force_update: bool) -> Outcome<Vec<Task>> {
        if !force_update {
            if let Some(tasks) = &*cache {
                debug!(count = tasks.len(), "serving tasks from cache");
                return Outcome::Success(tasks.clone());
            }
        }
        let mut source = Source::PRIMARY;
        loop {
            match self.source(source).get_tasks().await {
                Outcome::Success(tasks) => {
                    if source == Source::Remote {
                        if let Err(err) = self.replace_local(&tasks).await {
                            return Outcome::Error(err);
                        }
                        *cache = Some(tasks.clone());
                    }
                    return Outcome::Success(tasks);
                }
                Outcome::Error(err) => match source.fallback_for(&err) {
                    Some(next) => {
                        warn!(error = %err, fallback = %next, "loading tasks failed, falling back");
                        source = next;
                    }
                    None => return Outcome::Error(err),
                },
                Outcome::Loading => return Outcome::Loading,
            }
        }
    }

    async fn load_task(&self, cache: &mut Option<Vec<Task>>, id: &TaskId, force_update: bool) -> Outcome<Task> {
        if !force_update {
            if let Some(task) = cache.iter().flatten().find(|t| t.id == *id) {
                return Outcome::Success(task.clone());
            }
        }
        let mut source = Source::PRIMARY;
        loop {
            match self.source(source).get_task(id).await {
                Outcome::Success(task) => {
                    if source == Source::Remote {
                        if let Err(err) = self.local.save_task(&task).await {
                            return Outcome::Error(err);
                        }
                        if let Some(tasks) = cache {
                            upsert(tasks, &task);
                        }
                    }
                    return Outcome::Success(task);
                }
                Outcome::Error(err) => match source.fallback_for(&err) {
                    Some(next) => {
                        warn!(error = %err, task = %id, fallback = %next, "loading task failed, falling back");
                        source = next;
                    }
                    None => return Outcome::Error(err),
                },
                Outcome::Loading => return Outcome::Loading,
            }
        }
    }

    async fn replace_local(&self, tasks: &[Task]) -> Result<(), TaskError> {
        self.local.replace_all(tasks).await?;
        debug!(count = tasks.len(), "local store replaced with remote tasks");
        Ok(())
    }

    /// Remote write failures from an unreachable service are tolerated; the
    /// local store still receives the write.
    fn tolerate_remote(&self, op: &'static str, result: Result<(), TaskError>) -> Result<(), TaskError> {
        match result {
            Err(err) if Source::Remote.fallback_for(&err).is_some() => {
                warn!(error = %err, op, "remote write skipped");
                Ok(())
            }
            other => other,
        }
    }

    /// Invalidates the snapshot and, when anyone is listening, reloads and
    /// publishes the new list. Runs whether or not the local write succeeded,
    /// since the remote may already hold the change.
    async fn after_write(&self, mut cache: Cache<'_>, op: &'static str, local: Result<(), TaskError>) -> Result<(), TaskError> {
        *cache = None;
        match &local {
            Ok(()) => info!(op, "tasks changed"),
            Err(err) => warn!(error = %err, op, "local write failed"),
        }
        if self.published.receiver_count() > 0 {
            let outcome = self.load_tasks(&mut cache, false).await;
            self.published.send_replace(outcome);
        }
        local
    }

    async fn resolve(&self, id: &TaskId) -> Result<Task, TaskError> {
        let mut cache = self.cache.lock().await;
        self.load_task(&mut cache, id, false).await.into_result()
    }
}

#[async_trait]
impl<R: TasksDataSource, L: TasksDataSource> TasksRepository for DefaultTasksRepository<R, L> {
    async fn get_tasks(&self, force_update: bool) -> Outcome<Vec<Task>> {
        let mut cache = self.cache.lock().await;
        self.load_tasks(&mut cache, force_update).await
    }

    async fn refresh_tasks(&self) {
        let mut cache = self.cache.lock().await;
        let outcome = self.load_tasks(&mut cache, true).await;
        self.published.send_replace(outcome);
    }

    async fn observe_tasks(&self) -> watch::Receiver<Outcome<Vec<Task>>> {
        let receiver = self.published.subscribe();
        let mut cache = self.cache.lock().await;
        let outcome = self.load_tasks(&mut cache, false).await;
        self.published.send_replace(outcome);
        receiver
    }

    async fn get_task(&self, id: &TaskId, force_update: bool) -> Outcome<Task> {
        let mut cache = self.cache.lock().await;
        self.load_task(&mut cache, id, force_update).await
    }

    async fn refresh_task(&self, id: &TaskId) {
        let mut cache = self.cache.lock().await;
        if let Outcome::Error(err) = self.load_task(&mut cache, id, true).await {
            warn!(error = %err, task = %id, "refreshing task failed");
        }
        let outcome = self.load_tasks(&mut cache, false).await;
        self.published.send_replace(outcome);
    }

    async fn observe_task(&self, id: &TaskId) -> TaskObserver {
        TaskObserver::new(id.clone(), self.observe_tasks().await)
    }

    async fn save_task(&self, task: &Task) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.save_task(task).await;
        self.tolerate_remote("save", remote)?;
        let local = self.local.save_task(task).await;
        self.after_write(cache, "save", local).await
    }

    async fn complete_task(&self, task: &Task) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.complete_task(&task.id).await;
        self.tolerate_remote("complete", remote)?;
        let local = self.local.complete_task(&task.id).await;
        self.after_write(cache, "complete", local).await
    }

    async fn complete_task_by_id(&self, id: &TaskId) -> Result<(), TaskError> {
        let task = self.resolve(id).await?;
        self.complete_task(&task).await
    }

    async fn activate_task(&self, task: &Task) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.activate_task(&task.id).await;
        self.tolerate_remote("activate", remote)?;
        let local = self.local.activate_task(&task.id).await;
        self.after_write(cache, "activate", local).await
    }

    async fn activate_task_by_id(&self, id: &TaskId) -> Result<(), TaskError> {
        let task = self.resolve(id).await?;
        self.activate_task(&task).await
    }

    async fn clear_completed_tasks(&self) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.clear_completed_tasks().await;
        self.tolerate_remote("clear_completed", remote)?;
        let local = self.local.clear_completed_tasks().await;
        self.after_write(cache, "clear_completed", local).await
    }

    async fn delete_all_tasks(&self) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.delete_all_tasks().await;
        self.tolerate_remote("delete_all", remote)?;
        let local = self.local.delete_all_tasks().await;
        self.after_write(cache, "delete_all", local).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
        let cache = self.cache.lock().await;
        let remote = self.remote.delete_task(id).await;
        self.tolerate_remote("delete", remote)?;
        let local = self.local.delete_task(id).await;
        self.after_write(cache, "delete", local).await
    }
}

fn upsert(tasks: &mut Vec<Task>, task: &Task) {
    match tasks.iter_mut().find(|t| t.id == task.id) {
        Some(existing) => *existing = task.clone(),
        None => tasks.push(task.clone()),
    }
}
