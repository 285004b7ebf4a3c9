use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// GET /health — liveness only; backend reachability is not probed here.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "blobsync-server",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
