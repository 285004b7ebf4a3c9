//! BlobSync worker: joins the consumer group, replays each storage event
//! against a local replica, and drains cleanly on shutdown.

mod handlers;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storage_engine::{LocalStorage, S3Storage, StorageAdapter};
use tracing::info;
use tracing_subscriber::EnvFilter;

use events_bus::KafkaClient;
use handlers::{register_handlers, SyncWorker};

#[derive(Parser, Debug)]
#[command(name = "blobsync-worker", about = "BlobSync event consumer worker")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = config_engine::load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;

    // Source is the backend the API mutates; the replica is always local.
    let source: Arc<dyn StorageAdapter> = if config.s3.is_configured() {
        info!(bucket = %config.s3.bucket, "replicating from S3 backend");
        Arc::new(S3Storage::from_config(&config.s3).await?)
    } else {
        info!(base_path = %config.local.base_path, "replicating from local backend");
        Arc::new(LocalStorage::new(&config.local.base_path))
    };
    let replica: Arc<dyn StorageAdapter> =
        Arc::new(LocalStorage::new(&config.worker.replica_base_path));

    let kafka = KafkaClient::new(&config.kafka).context("creating kafka client")?;
    let worker = Arc::new(SyncWorker::new(source, replica));
    register_handlers(&kafka, worker).await;

    let topic = config.kafka.topics.storage_events.clone();
    kafka
        .start_consumers(&[topic.clone()])
        .await
        .context("starting consumer loop")?;
    info!(topic = %topic, group = %config.kafka.consumer_group, "worker consuming");

    tokio::signal::ctrl_c()
        .await
        .context("installing shutdown signal handler")?;
    info!("shutdown signal received, draining");
    kafka.close().await;
    Ok(())
}
