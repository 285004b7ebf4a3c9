//! BlobSync HTTP server
//!
//! Serves the file mutation API and propagates each mutation as a
//! `StorageEvent` on the broker. Publishing is best-effort: a broker failure
//! is logged and never surfaced to the HTTP caller.

pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;

pub use error::*;
pub use server::BlobSyncServer;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the application router with all routes and middleware.
pub fn create_app(server: BlobSyncServer) -> Router {
    routes::create_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}
