use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_common::StorageError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers.
///
/// Broker-side failures never appear here; publishing is best-effort and
/// invisible to the original caller.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request input
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Storage(StorageError::NotFound(path)) => {
                (StatusCode::NOT_FOUND, format!("entry not found: {}", path))
            }
            ApiError::Storage(StorageError::AlreadyExists(path)) => (
                StatusCode::CONFLICT,
                format!("entry already exists and overwrite is disabled: {}", path),
            ),
            ApiError::Storage(err) => {
                tracing::error!(error = %err, "storage backend error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage operation failed".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
