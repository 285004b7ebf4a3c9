use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

use crate::error::ApiError;
use crate::handlers::require_path;
use crate::server::BlobSyncServer;
use events_bus::{EventType, StorageEvent};

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub overwrite: bool,
}

/// POST /upload/{*path} — store the multipart `file` field at `path`, then
/// publish a `FileUploaded` event carrying the upload metadata.
pub async fn upload_file(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let path = require_path(&path)?.to_string();

    let mut content: Option<Vec<u8>> = None;
    let mut filename = String::new();
    let mut content_type = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        filename = field.file_name().unwrap_or_default().to_string();
        content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("failed to read file field: {}", e)))?;
        content = Some(bytes.to_vec());
        break;
    }

    let content = content
        .ok_or_else(|| ApiError::Validation("multipart field 'file' is required".to_string()))?;
    let size = content.len() as i64;

    server.storage.write(&path, &content, params.overwrite).await?;
    debug!(path = %path, size = size, overwrite = params.overwrite, "file written");

    let event = StorageEvent::new(EventType::FileUploaded, &path)
        .with_size(size)
        .with_metadata(HashMap::from([
            ("filename".to_string(), filename),
            ("contentType".to_string(), content_type),
            ("overwrite".to_string(), params.overwrite.to_string()),
        ]));
    server.publish_event(event).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "path": path, "size": size })),
    )
        .into_response())
}

/// GET /read/{*path} — raw file bytes.
pub async fn read_file(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let path = require_path(&path)?;
    let content = server.storage.read(path).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        content,
    )
        .into_response())
}

/// DELETE /delete/{*path} — remove one file and publish `FileDeleted`.
pub async fn delete_file(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let path = require_path(&path)?.to_string();
    server.storage.delete(&path).await?;

    server
        .publish_event(StorageEvent::new(EventType::FileDeleted, &path))
        .await;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// GET /list — everything under the storage root.
pub async fn list_root(State(server): State<BlobSyncServer>) -> Result<Response, ApiError> {
    list_prefix(&server, "").await
}

/// GET /list/{*path} — everything under a prefix.
pub async fn list_files(
    State(server): State<BlobSyncServer>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    list_prefix(&server, require_path(&path)?).await
}

async fn list_prefix(server: &BlobSyncServer, prefix: &str) -> Result<Response, ApiError> {
    let files = server.storage.list(prefix).await?;
    Ok((StatusCode::OK, Json(json!({ "files": files }))).into_response())
}
