#[cfg(test)]
mod tests {
    use super::super::tasks_repository::{TaskObserver, TasksRepository};
    use super::super::tasks_service::{Notice, TasksService, TasksServiceImpl};
    use crate::domain::{
        error::TaskError,
        filter::TasksFilterType,
        outcome::Outcome,
        task::{CreateTask, Task, TaskId, UpdateTask},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tokio::sync::watch;

    struct FakeRepository {
        tasks: Mutex<Vec<Task>>,
        return_error: AtomicBool,
        published: watch::Sender<Outcome<Vec<Task>>>,
    }

    impl FakeRepository {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            let (published, _) = watch::channel(Outcome::Loading);
            Self { tasks: Mutex::new(tasks), return_error: AtomicBool::new(false), published }
        }

        fn set_return_error(&self, value: bool) { self.return_error.store(value, Ordering::SeqCst); }

        fn stored(&self, id: &TaskId) -> Option<Task> { self.tasks.lock().unwrap().iter().find(|t| t.id == *id).cloned() }

        fn update(&self, id: &TaskId, f: impl Fn(&Task) -> Task) {
            let mut tasks = self.tasks.lock().unwrap();
            if let Some(task) = tasks.iter_mut().find(|t| t.id == *id) {
                *task = f(task);
            }
        }
    }

    #[async_trait]
    impl TasksRepository for FakeRepository {
        async fn get_tasks(&self, _force_update: bool) -> Outcome<Vec<Task>> {
            if self.return_error.load(Ordering::SeqCst) {
                return Outcome::Error(TaskError::Unknown("Test exception".into()));
            }
            Outcome::Success(self.tasks.lock().unwrap().clone())
        }
        async fn refresh_tasks(&self) { self.published.send_replace(self.get_tasks(true).await); }
        async fn observe_tasks(&self) -> watch::Receiver<Outcome<Vec<Task>>> {
            let rx = self.published.subscribe();
            self.refresh_tasks().await;
            rx
        }
        async fn get_task(&self, id: &TaskId, _force_update: bool) -> Outcome<Task> {
            if self.return_error.load(Ordering::SeqCst) {
                return Outcome::Error(TaskError::Unknown("Test exception".into()));
            }
            match self.stored(id) {
                Some(task) => Outcome::Success(task),
                None => Outcome::Error(TaskError::NotFound(id.clone())),
            }
        }
        async fn refresh_task(&self, _id: &TaskId) { self.refresh_tasks().await }
        async fn observe_task(&self, id: &TaskId) -> TaskObserver { TaskObserver::new(id.clone(), self.observe_tasks().await) }
        async fn save_task(&self, task: &Task) -> Result<(), TaskError> {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.retain(|t| t.id != task.id);
            tasks.push(task.clone());
            Ok(())
        }
        async fn complete_task(&self, task: &Task) -> Result<(), TaskError> {
            self.update(&task.id, Task::completed);
            Ok(())
        }
        async fn complete_task_by_id(&self, id: &TaskId) -> Result<(), TaskError> {
            self.update(id, Task::completed);
            Ok(())
        }
        async fn activate_task(&self, task: &Task) -> Result<(), TaskError> {
            self.update(&task.id, Task::activated);
            Ok(())
        }
        async fn activate_task_by_id(&self, id: &TaskId) -> Result<(), TaskError> {
            self.update(id, Task::activated);
            Ok(())
        }
        async fn clear_completed_tasks(&self) -> Result<(), TaskError> {
            self.tasks.lock().unwrap().retain(Task::is_active);
            Ok(())
        }
        async fn delete_all_tasks(&self) -> Result<(), TaskError> {
            self.tasks.lock().unwrap().clear();
            Ok(())
        }
        async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
            self.tasks.lock().unwrap().retain(|t| t.id != *id);
            Ok(())
        }
    }

    fn service() -> (TasksServiceImpl<FakeRepository>, Vec<Task>) {
        let tasks = vec![
            Task::new("Title1", "Description1"),
            Task::new("Title2", "Description2").completed(),
            Task::new("Title3", "Description3").completed(),
        ];
        (TasksServiceImpl::new(FakeRepository::with_tasks(tasks.clone())), tasks)
    }

    #[tokio::test]
    async fn unit_create_and_get() {
        let (service, _) = service();
        let created = service.create(CreateTask { title: "X".into(), description: String::new() }).await.unwrap();
        assert_eq!(created.title, "X");
        let got = service.get(&created.id).await.into_result().unwrap();
        assert_eq!(got.id, created.id);
        assert_eq!(service.take_notice(), Some(Notice::TaskAdded));
        assert_eq!(service.take_notice(), None);
        assert_eq!(service.peek_notice(), Some(Notice::TaskAdded));
    }

    #[tokio::test]
    async fn empty_task_is_rejected_without_saving() {
        let (service, tasks) = service();
        let err = service.create(CreateTask { title: String::new(), description: String::new() }).await.unwrap_err();
        assert!(matches!(err, TaskError::Invalid(_)));
        assert_eq!(service.list(TasksFilterType::All, false).await.data().map(Vec::len), Some(tasks.len()));
        assert_eq!(service.peek_notice(), None);
    }

    #[tokio::test]
    async fn update_keeps_id_and_completion() {
        let (service, tasks) = service();
        let done = &tasks[1];
        let input = UpdateTask { title: Some("renamed".into()), description: None };
        let updated = service.update(&done.id, input).await.unwrap();
        assert_eq!(updated, Task::with_id(done.id.clone(), "renamed", "Description2", true));
        assert_eq!(service.repository().stored(&done.id), Some(updated));

        let blank = UpdateTask { title: Some(String::new()), description: Some(String::new()) };
        assert!(matches!(service.update(&done.id, blank).await, Err(TaskError::Invalid(_))));
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let (service, tasks) = service();
        let active = service.list(TasksFilterType::Active, false).await;
        assert_eq!(active, Outcome::Success(vec![tasks[0].clone()]));
        let completed = service.list(TasksFilterType::Completed, true).await;
        assert_eq!(completed.data().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn complete_task_updates_data_and_notice() {
        let (service, tasks) = service();
        let task = &tasks[0];
        let completed = service.set_completed(&task.id, true).await.unwrap();
        assert!(completed.is_completed);
        assert_eq!(service.repository().stored(&task.id).map(|t| t.is_completed), Some(true));
        assert_eq!(service.take_notice(), Some(Notice::MarkedComplete));

        service.set_completed(&task.id, false).await.unwrap();
        assert_eq!(service.repository().stored(&task.id).map(|t| t.is_completed), Some(false));
        assert_eq!(service.take_notice(), Some(Notice::MarkedActive));
    }

    #[tokio::test]
    async fn statistics_reflect_repository() {
        let (service, _) = service();
        let stats = service.statistics().await.into_result().unwrap();
        assert!((stats.active_percent - 33.33).abs() < 0.01);
        assert!((stats.completed_percent - 66.67).abs() < 0.01);

        service.delete_all().await.unwrap();
        let stats = service.statistics().await.into_result().unwrap();
        assert_eq!((stats.active_percent, stats.completed_percent), (0.0, 0.0));
        assert_eq!(service.take_notice(), Some(Notice::AllDeleted));
    }

    #[tokio::test]
    async fn repository_error_surfaces_as_outcome() {
        let (service, tasks) = service();
        service.repository().set_return_error(true);
        assert!(matches!(service.list(TasksFilterType::All, false).await, Outcome::Error(_)));
        assert!(matches!(service.statistics().await, Outcome::Error(_)));
        assert!(service.set_completed(&tasks[0].id, true).await.is_err());
    }

    #[tokio::test]
    async fn clear_completed_and_delete() {
        let (service, tasks) = service();
        service.clear_completed().await.unwrap();
        assert_eq!(service.take_notice(), Some(Notice::CompletedCleared));
        assert_eq!(service.list(TasksFilterType::All, false).await, Outcome::Success(vec![tasks[0].clone()]));

        service.delete(&tasks[0].id).await.unwrap();
        assert_eq!(service.take_notice(), Some(Notice::TaskDeleted));
        assert!(matches!(service.get(&tasks[0].id).await, Outcome::Error(TaskError::NotFound(_))));
    }
}
