use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storage_engine::{LocalStorage, S3Storage, StorageAdapter};
use tracing::info;

use blobsync_server::logging::{init_tracing, LogShipper};
use blobsync_server::{create_app, BlobSyncServer};
use events_bus::KafkaClient;

#[derive(Parser, Debug)]
#[command(name = "blobsync-server", about = "BlobSync HTTP API server")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = config_engine::load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;

    let shipper = LogShipper::from_config(&config.logging);

    let storage: Arc<dyn StorageAdapter> = if config.s3.is_configured() {
        info!(bucket = %config.s3.bucket, "using S3 storage backend");
        Arc::new(S3Storage::from_config(&config.s3).await?)
    } else {
        info!(base_path = %config.local.base_path, "using local storage backend");
        Arc::new(LocalStorage::new(&config.local.base_path))
    };

    let kafka = Arc::new(KafkaClient::new(&config.kafka).context("creating kafka client")?);

    let server = BlobSyncServer::new(
        storage,
        Arc::clone(&kafka) as Arc<dyn events_bus::EventPublisher>,
        config.kafka.topics.storage_events.clone(),
    );
    let app = create_app(server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(addr = %addr, "blobsync-server listening");
    shipper.ship("info", "blobsync-server started", None).await;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("http server stopped, closing kafka client");
    kafka.close().await;
    shipper.ship("info", "blobsync-server stopped", None).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
    }
    info!("shutdown signal received");
}
