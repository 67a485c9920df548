use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    application::tasks_service::TasksService,
    domain::{
        filter::TasksFilterType,
        statistics::StatsResult,
        task::{CreateTask, Task, TaskId, UpdateTask},
    },
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<S: TasksService> { pub service: S }

pub fn router<S: TasksService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>).delete(delete_all_tasks::<S>))
        .route("/tasks/completed", delete(clear_completed_tasks::<S>))
        .route("/tasks/:id", get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>))
        .route("/tasks/:id/complete", post(complete_task::<S>))
        .route("/tasks/:id/activate", post(activate_task::<S>))
        .route("/statistics", get(statistics::<S>))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    filter: Option<String>,
    #[serde(default)]
    force: bool,
}

#[derive(Serialize)]
struct TaskList { items: Vec<Task> }

async fn list_tasks<S: TasksService>(State(state): State<AppState<S>>, Query(query): Query<ListQuery>) -> Result<Json<TaskList>, ApiError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<TasksFilterType>().map_err(ApiError::bad_request)?,
        None => TasksFilterType::All,
    };
    let items = state.service.list(filter, query.force).await.into_result()?;
    Ok(Json(TaskList { items }))
}

async fn create_task<S: TasksService>(State(state): State<AppState<S>>, Json(payload): Json<CreateTask>) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.service.create(payload).await?))
}

async fn get_task<S: TasksService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get(&id).await.into_result()?))
}

async fn update_task<S: TasksService>(State(state): State<AppState<S>>, Path(id): Path<String>, Json(payload): Json<UpdateTask>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.update(&id, payload).await?))
}

async fn complete_task<S: TasksService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.set_completed(&id, true).await?))
}

async fn activate_task<S: TasksService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.set_completed(&id, false).await?))
}

async fn delete_task<S: TasksService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_completed_tasks<S: TasksService>(State(state): State<AppState<S>>) -> Result<StatusCode, ApiError> {
    state.service.clear_completed().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_tasks<S: TasksService>(State(state): State<AppState<S>>) -> Result<StatusCode, ApiError> {
    state.service.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn statistics<S: TasksService>(State(state): State<AppState<S>>) -> Result<Json<StatsResult>, ApiError> {
    Ok(Json(state.service.statistics().await.into_result()?))
}

fn parse_id(s: &str) -> Result<TaskId, ApiError> {
    uuid::Uuid::parse_str(s).map(|u| TaskId(u.to_string())).map_err(|_| ApiError::bad_request("invalid id"))
}
