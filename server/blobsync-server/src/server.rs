use events_bus::{EventPublisher, StorageEvent};
use std::sync::Arc;
use storage_engine::StorageAdapter;
use tracing::{info, warn};

/// Shared application state handed to every route handler.
///
/// The storage adapter and the publisher are chosen once at startup; handlers
/// never branch on which backend or broker implementation is behind them.
#[derive(Clone)]
pub struct BlobSyncServer {
    pub storage: Arc<dyn StorageAdapter>,
    pub publisher: Arc<dyn EventPublisher>,
    pub topic: String,
}

impl BlobSyncServer {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        publisher: Arc<dyn EventPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            publisher,
            topic: topic.into(),
        }
    }

    /// Publish one event, best-effort. The storage mutation has already
    /// happened and is never rolled back on a broker failure.
    pub async fn publish_event(&self, event: StorageEvent) {
        match self.publisher.publish(&self.topic, &event).await {
            Ok(ack) => info!(
                event_type = %event.event_type,
                path = %event.path,
                partition = ack.partition,
                offset = ack.offset,
                "storage event published"
            ),
            Err(e) => warn!(
                event_type = %event.event_type,
                path = %event.path,
                error = %e,
                "failed to publish storage event, continuing"
            ),
        }
    }
}
