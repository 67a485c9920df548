pub mod routes;
pub mod types;

use axum::{routing::get, Router};

use crate::application::tasks_service::TasksService;
use routes::tasks::{self, AppState};

/// Full HTTP surface: health check plus the task routes.
pub fn app<S: TasksService + Clone + Send + Sync + 'static>(service: S) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(tasks::router(AppState { service }))
}
