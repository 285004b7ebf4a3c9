use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::require_path;
use crate::server::BlobSyncServer;
use events_bus::{EventType, StorageEvent};

/// Marker entry that makes an otherwise-empty directory visible on backends
/// with no native directory concept.
pub const DIR_MARKER: &str = ".keep";

fn marker_path(path: &str) -> String {
    format!("{}/{}", path, DIR_MARKER)
}

/// POST /directory/{*path} — materialize a directory via its marker entry and
/// publish `DirectoryCreated`.
pub async fn create_directory(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let path = require_path(&path)?.to_string();
    server.storage.write(&marker_path(&path), b"", false).await?;

    server
        .publish_event(StorageEvent::new(EventType::DirectoryCreated, &path))
        .await;

    Ok((StatusCode::CREATED, Json(json!({ "path": path }))).into_response())
}

/// DELETE /directory/{*path} — remove the marker entry and publish
/// `DirectoryDeleted`.
pub async fn delete_directory(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let path = require_path(&path)?.to_string();
    server.storage.delete(&marker_path(&path)).await?;

    server
        .publish_event(StorageEvent::new(EventType::DirectoryDeleted, &path))
        .await;

    Ok(StatusCode::NO_CONTENT.into_response())
}
