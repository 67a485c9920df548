use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::tasks_repository::TasksRepository;
use crate::domain::{
    error::TaskError,
    event::Event,
    filter::TasksFilterType,
    outcome::Outcome,
    statistics::{active_and_completed_stats, StatsResult},
    task::{CreateTask, Task, TaskId, UpdateTask},
};

/// Message raised by a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    TaskAdded,
    TaskSaved,
    TaskDeleted,
    MarkedComplete,
    MarkedActive,
    CompletedCleared,
    AllDeleted,
}

#[async_trait]
pub trait TasksService: Send + Sync + 'static {
    async fn list(&self, filter: TasksFilterType, force_update: bool) -> Outcome<Vec<Task>>;
    async fn get(&self, id: &TaskId) -> Outcome<Task>;
    async fn create(&self, input: CreateTask) -> Result<Task, TaskError>;
    async fn update(&self, id: &TaskId, input: UpdateTask) -> Result<Task, TaskError>;
    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<Task, TaskError>;
    async fn delete(&self, id: &TaskId) -> Result<(), TaskError>;
    async fn clear_completed(&self) -> Result<(), TaskError>;
    async fn delete_all(&self) -> Result<(), TaskError>;
    async fn statistics(&self) -> Outcome<StatsResult>;
}

pub struct TasksServiceImpl<R: TasksRepository> {
    repo: Arc<R>,
    notice: Arc<Mutex<Option<Event<Notice>>>>,
}

impl<R: TasksRepository> Clone for TasksServiceImpl<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo), notice: Arc::clone(&self.notice) } }
}

impl<R: TasksRepository> TasksServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self::from_shared(Arc::new(repo)) }

    pub fn from_shared(repo: Arc<R>) -> Self { Self { repo, notice: Arc::new(Mutex::new(None)) } }

    pub fn repository(&self) -> &R { &self.repo }

    /// Latest notice, handed out once.
    pub fn take_notice(&self) -> Option<Notice> {
        let mut slot = self.notice.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_mut().and_then(|event| event.content_if_not_handled().copied())
    }

    /// Latest notice, whether or not it was already taken.
    pub fn peek_notice(&self) -> Option<Notice> {
        let slot = self.notice.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().map(|event| *event.peek_content())
    }

    fn notify(&self, notice: Notice) {
        let mut slot = self.notice.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Event::new(notice));
    }
}

fn reject_empty(task: &Task) -> Result<(), TaskError> {
    if task.is_empty() { Err(TaskError::Invalid("a task needs a title or a description".into())) } else { Ok(()) }
}

#[async_trait]
impl<R: TasksRepository> TasksService for TasksServiceImpl<R> {
    async fn list(&self, filter: TasksFilterType, force_update: bool) -> Outcome<Vec<Task>> {
        self.repo.get_tasks(force_update).await.map(|tasks| filter.apply(tasks))
    }

    async fn get(&self, id: &TaskId) -> Outcome<Task> { self.repo.get_task(id, false).await }

    async fn create(&self, input: CreateTask) -> Result<Task, TaskError> {
        let task = Task::new(input.title, input.description);
        reject_empty(&task)?;
        self.repo.save_task(&task).await?;
        self.notify(Notice::TaskAdded);
        Ok(task)
    }

    async fn update(&self, id: &TaskId, input: UpdateTask) -> Result<Task, TaskError> {
        let existing = self.repo.get_task(id, false).await.into_result()?;
        let task = Task::with_id(
            existing.id,
            input.title.unwrap_or(existing.title),
            input.description.unwrap_or(existing.description),
            existing.is_completed,
        );
        reject_empty(&task)?;
        self.repo.save_task(&task).await?;
        self.notify(Notice::TaskSaved);
        Ok(task)
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<Task, TaskError> {
        let task = self.repo.get_task(id, false).await.into_result()?;
        if completed {
            self.repo.complete_task(&task).await?;
            self.notify(Notice::MarkedComplete);
            Ok(task.completed())
        } else {
            self.repo.activate_task(&task).await?;
            self.notify(Notice::MarkedActive);
            Ok(task.activated())
        }
    }

    async fn delete(&self, id: &TaskId) -> Result<(), TaskError> {
        self.repo.delete_task(id).await?;
        self.notify(Notice::TaskDeleted);
        Ok(())
    }

    async fn clear_completed(&self) -> Result<(), TaskError> {
        self.repo.clear_completed_tasks().await?;
        self.notify(Notice::CompletedCleared);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), TaskError> {
        self.repo.delete_all_tasks().await?;
        self.notify(Notice::AllDeleted);
        Ok(())
    }

    async fn statistics(&self) -> Outcome<StatsResult> {
        self.repo.get_tasks(false).await.map(|tasks| active_and_completed_stats(Some(tasks.as_slice())))
    }
}
