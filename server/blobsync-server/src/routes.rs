use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::server::BlobSyncServer;

/// All API routes. Middleware and state are layered on by the caller.
pub fn create_routes() -> Router<BlobSyncServer> {
    Router::new()
        // Health
        .route("/health", get(handlers::health::health_check))
        // Files
        .route("/upload/*path", post(handlers::files::upload_file))
        .route("/read/*path", get(handlers::files::read_file))
        .route("/delete/*path", delete(handlers::files::delete_file))
        // Directories
        .route(
            "/directory/*path",
            post(handlers::directories::create_directory)
                .delete(handlers::directories::delete_directory),
        )
        // Listing
        .route("/list", get(handlers::files::list_root))
        .route("/list/*path", get(handlers::files::list_files))
}
