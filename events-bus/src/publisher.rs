use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::Result;
use crate::event::StorageEvent;

/// Physical placement of an acknowledged message, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishAck {
    pub partition: i32,
    pub offset: i64,
}

/// Producer seam between the orchestrator and the broker.
///
/// Publishing is best-effort with respect to the storage mutation that
/// precedes it: a failed publish is logged by the caller and never rolls the
/// mutation back.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &StorageEvent) -> Result<PublishAck>;
}

/// Recording publisher for development and testing.
#[derive(Default)]
pub struct MemoryPublisher {
    published: Mutex<Vec<(String, StorageEvent)>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, StorageEvent)> {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, topic: &str, event: &StorageEvent) -> Result<PublishAck> {
        let mut published = self
            .published
            .lock()
            .map_err(|_| crate::error::EventBusError::Handler("publisher poisoned".to_string()))?;
        let offset = published.len() as i64;
        published.push((topic.to_string(), event.clone()));
        Ok(PublishAck {
            partition: 0,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    #[tokio::test]
    async fn memory_publisher_records_in_order() {
        let publisher = MemoryPublisher::new();
        let first = StorageEvent::new(EventType::FileUploaded, "a");
        let second = StorageEvent::new(EventType::FileDeleted, "b");

        let ack1 = publisher.publish("storage-events", &first).await.unwrap();
        let ack2 = publisher.publish("storage-events", &second).await.unwrap();
        assert_eq!(ack1.offset, 0);
        assert_eq!(ack2.offset, 1);

        let published = publisher.published();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].1.path, "a");
        assert_eq!(published[1].1.path, "b");
    }
}
