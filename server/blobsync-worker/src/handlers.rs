use std::sync::Arc;
use storage_engine::{StorageAdapter, StorageError};
use tracing::{info, warn};

use events_bus::{EventBusError, EventType, KafkaClient, StorageEvent};

const DIR_MARKER: &str = ".keep";

/// Re-applies storage mutations described by events against a replica.
///
/// Events carry no file content, so upload and append are replayed by reading
/// the current bytes from the source backend. Every handler is idempotent:
/// redelivered events converge on the same replica state.
pub struct SyncWorker {
    source: Arc<dyn StorageAdapter>,
    replica: Arc<dyn StorageAdapter>,
}

impl SyncWorker {
    pub fn new(source: Arc<dyn StorageAdapter>, replica: Arc<dyn StorageAdapter>) -> Self {
        Self { source, replica }
    }

    /// Apply one event to the replica.
    pub async fn apply(&self, event: StorageEvent) -> Result<(), EventBusError> {
        match event.event_type {
            EventType::FileUploaded | EventType::FileAppended => {
                self.copy_from_source(&event.path).await
            }
            EventType::FileDeleted => self.remove(&event.path).await,
            EventType::DirectoryCreated => {
                let marker = format!("{}/{}", event.path, DIR_MARKER);
                self.replica
                    .write(&marker, b"", true)
                    .await
                    .map_err(|e| EventBusError::Handler(e.to_string()))?;
                info!(path = %event.path, "directory replicated");
                Ok(())
            }
            EventType::DirectoryDeleted => {
                let marker = format!("{}/{}", event.path, DIR_MARKER);
                self.remove(&marker).await
            }
        }
    }

    async fn copy_from_source(&self, path: &str) -> Result<(), EventBusError> {
        let content = match self.source.read(path).await {
            Ok(content) => content,
            Err(StorageError::NotFound(_)) => {
                // Already deleted upstream; a later FileDeleted event will
                // converge the replica.
                warn!(path = %path, "source entry gone before replication, skipping");
                return Ok(());
            }
            Err(e) => return Err(EventBusError::Handler(e.to_string())),
        };

        self.replica
            .write(path, &content, true)
            .await
            .map_err(|e| EventBusError::Handler(e.to_string()))?;
        info!(path = %path, size = content.len(), "file replicated");
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), EventBusError> {
        match self.replica.delete(path).await {
            Ok(()) => {
                info!(path = %path, "replica entry removed");
                Ok(())
            }
            // Never replicated or already removed; deletion is idempotent.
            Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(EventBusError::Handler(e.to_string())),
        }
    }
}

/// Register one handler per event type on the broker client.
pub async fn register_handlers(kafka: &KafkaClient, worker: Arc<SyncWorker>) {
    for event_type in [
        EventType::FileUploaded,
        EventType::FileAppended,
        EventType::FileDeleted,
        EventType::DirectoryCreated,
        EventType::DirectoryDeleted,
    ] {
        let worker = Arc::clone(&worker);
        kafka
            .register_handler(event_type, move |event| {
                let worker = Arc::clone(&worker);
                async move { worker.apply(event).await }
            })
            .await;
    }
}
