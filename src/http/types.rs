use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::TaskError;

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self { Self { status: 400, message: message.into() } }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let status = match &err {
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Invalid(_) => StatusCode::BAD_REQUEST,
            TaskError::SourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            TaskError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status: status.as_u16(), message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(status = self.status, message = %self.message, "request failed");
        }
        (status, axum::Json(self)).into_response()
    }
}
