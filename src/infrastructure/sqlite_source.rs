use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    data_source::TasksDataSource,
    error::TaskError,
    outcome::Outcome,
    source::Source,
    task::{Task, TaskId},
};

/// Local store backed by SQLite.
#[derive(Clone)]
pub struct SqliteTasksDataSource {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTasksDataSource {
    /// Opens a pool, creating the database file (and its directory) first
    /// for file-backed URLs.
    pub async fn connect(database_url: &str) -> Result<Self> {
        ensure_database_file(database_url)?;
        let mut options = SqlitePoolOptions::new().max_connections(5);
        // every connection to :memory: opens its own database
        if database_url.starts_with("sqlite::memory:") {
            options = options.max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = options.connect(database_url).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), TaskError> {
        sqlx::query("UPDATE tasks SET completed = ?2 WHERE id = ?1")
            .bind(&id.0)
            .bind(completed)
            .execute(&*self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl TasksDataSource for SqliteTasksDataSource {
    async fn get_tasks(&self) -> Outcome<Vec<Task>> {
        let rows = sqlx::query("SELECT id, title, description, completed FROM tasks ORDER BY rowid")
            .fetch_all(&*self.pool)
            .await;
        match rows {
            Ok(rows) => rows.iter().map(row_to_task).collect::<Result<Vec<_>, _>>().into(),
            Err(err) => Outcome::Error(unavailable(err)),
        }
    }

    async fn get_task(&self, id: &TaskId) -> Outcome<Task> {
        let row = sqlx::query("SELECT id, title, description, completed FROM tasks WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&*self.pool)
            .await;
        match row {
            Ok(Some(row)) => row_to_task(&row).into(),
            Ok(None) => Outcome::Error(TaskError::NotFound(id.clone())),
            Err(err) => Outcome::Error(unavailable(err)),
        }
    }

    async fn save_task(&self, task: &Task) -> Result<(), TaskError> {
        // upsert rather than REPLACE so the row keeps its position
        sqlx::query(
            "INSERT INTO tasks (id, title, description, completed) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, description = excluded.description, completed = excluded.completed",
        )
        .bind(&task.id.0)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .execute(&*self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }

    async fn complete_task(&self, id: &TaskId) -> Result<(), TaskError> { self.set_completed(id, true).await }

    async fn activate_task(&self, id: &TaskId) -> Result<(), TaskError> { self.set_completed(id, false).await }

    async fn clear_completed_tasks(&self) -> Result<(), TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE completed = 1")
            .execute(&*self.pool)
            .await
            .map_err(unavailable)?;
        tracing::debug!(removed = result.rows_affected(), "cleared completed tasks");
        Ok(())
    }

    async fn delete_all_tasks(&self) -> Result<(), TaskError> {
        sqlx::query("DELETE FROM tasks").execute(&*self.pool).await.map_err(unavailable)?;
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
        sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(&id.0)
            .execute(&*self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn replace_all(&self, tasks: &[Task]) -> Result<(), TaskError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;
        sqlx::query("DELETE FROM tasks").execute(&mut *tx).await.map_err(unavailable)?;
        for task in tasks {
            sqlx::query("INSERT INTO tasks (id, title, description, completed) VALUES (?1, ?2, ?3, ?4)")
                .bind(&task.id.0)
                .bind(&task.title)
                .bind(&task.description)
                .bind(task.is_completed)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
        }
        // dropping an uncommitted transaction rolls it back
        tx.commit().await.map_err(unavailable)?;
        Ok(())
    }
}

fn ensure_database_file(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else { return Ok(()) };
    let path = path.split('?').next().unwrap_or(path);
    // Windows absolute paths arrive as /C:/dir/file.db
    let path = match path.as_bytes() {
        [b'/', _, b':', ..] if cfg!(windows) => &path[1..],
        _ => path,
    };
    let file = Path::new(path);
    if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    if !file.exists() {
        OpenOptions::new().create(true).append(true).open(file)?;
        tracing::info!(path = %file.display(), "created sqlite database file");
    }
    Ok(())
}

fn row_to_task(row: &SqliteRow) -> Result<Task, TaskError> {
    let id: String = row.try_get("id").map_err(unavailable)?;
    let title: String = row.try_get("title").map_err(unavailable)?;
    let description: String = row.try_get("description").map_err(unavailable)?;
    let completed: bool = row.try_get("completed").map_err(unavailable)?;
    Ok(Task::with_id(TaskId(id), title, description, completed))
}

fn unavailable(err: sqlx::Error) -> TaskError {
    tracing::error!(error = %err, "sqlite task store failed");
    TaskError::unavailable(Source::Local, err.to_string())
}
