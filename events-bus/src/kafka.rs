use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{EventBusError, Result};
use crate::event::{EventType, StorageEvent};
use crate::handlers::HandlerRegistry;
use crate::publisher::{EventPublisher, PublishAck};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka producer and consumer-group subscriber.
///
/// Created once per process. `close` is terminal: it signals cancellation,
/// waits for the consumer loop to drain, then flushes the producer. It must
/// not race `start_consumers` from another caller.
pub struct KafkaClient {
    producer: FutureProducer,
    consumer: Arc<StreamConsumer>,
    registry: Arc<HandlerRegistry>,
    cancel: CancellationToken,
    consumer_task: Mutex<Option<JoinHandle<()>>>,
}

impl KafkaClient {
    /// Create producer and consumer-group handles.
    ///
    /// The producer waits for acknowledgment from all in-sync replicas and
    /// retries transient send failures up to the configured bound before a
    /// publish surfaces as an error. The consumer commits offsets manually
    /// and starts from the latest offset on first join.
    pub fn new(cfg: &config_engine::KafkaConfig) -> Result<Self> {
        let brokers = cfg.brokers.join(",");

        let acks = if cfg.producer.required_acks < 0 {
            "all".to_string()
        } else {
            cfg.producer.required_acks.to_string()
        };

        let mut producer_config = ClientConfig::new();
        producer_config
            .set("bootstrap.servers", &brokers)
            .set("acks", &acks)
            .set("message.send.max.retries", cfg.producer.retries.to_string())
            .set("compression.codec", compression_codec(cfg.producer.compression))
            .set("message.timeout.ms", "30000");
        let producer: FutureProducer = producer_config.create()?;

        let mut consumer_config = ClientConfig::new();
        consumer_config
            .set("group.id", &cfg.consumer_group)
            .set("bootstrap.servers", &brokers)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false");
        let consumer: StreamConsumer = consumer_config.create()?;

        Ok(Self {
            producer,
            consumer: Arc::new(consumer),
            registry: Arc::new(HandlerRegistry::new()),
            cancel: CancellationToken::new(),
            consumer_task: Mutex::new(None),
        })
    }

    /// Register a handler for one event type. Call before `start_consumers`.
    pub async fn register_handler<F, Fut>(&self, event_type: EventType, handler: F)
    where
        F: Fn(StorageEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.registry.register(event_type, handler).await;
        info!(event_type = %event_type, "registered handler for event type");
    }

    /// Join the consumer group for `topics` and spawn the supervised loop.
    ///
    /// Exactly one loop runs per client; a second call is refused so no loop
    /// can outlive supervision. The group session is rejoined on rebalance
    /// until the cancellation token fires. Within a partition, messages are
    /// decoded, dispatched and committed strictly in delivery order; an
    /// in-flight handler finishes before cancellation is observed.
    pub async fn start_consumers(&self, topics: &[String]) -> Result<()> {
        let mut task = self.consumer_task.lock().await;
        if task.is_some() {
            return Err(EventBusError::Subscribe(
                "consumer loop already running".to_string(),
            ));
        }

        let topic_refs: Vec<&str> = topics.iter().map(String::as_str).collect();
        self.consumer
            .subscribe(&topic_refs)
            .map_err(|e| EventBusError::Subscribe(e.to_string()))?;

        let consumer = Arc::clone(&self.consumer);
        let registry = Arc::clone(&self.registry);
        let cancel = self.cancel.clone();
        let topics = topics.to_vec();

        let handle = tokio::spawn(async move {
            info!(topics = ?topics, "consumer loop started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("consumer loop draining");
                        break;
                    }
                    received = consumer.recv() => match received {
                        Ok(message) => {
                            let payload = message.payload().unwrap_or_default();
                            let outcome = registry.dispatch(payload).await;
                            debug!(
                                partition = message.partition(),
                                offset = message.offset(),
                                ?outcome,
                                "message processed"
                            );
                            // Committed regardless of the dispatch outcome:
                            // at-least-once covers crashes between receipt
                            // and commit, not handler-level failures.
                            if let Err(e) = consumer.commit_message(&message, CommitMode::Async) {
                                debug!(error = %e, "offset commit failed");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "error during consumption");
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        });

        *task = Some(handle);
        Ok(())
    }

    /// Signal cancellation, wait for the consumer loop to exit, then flush
    /// the producer. A close before any consumer started only flushes the
    /// producer.
    pub async fn close(&self) {
        self.cancel.cancel();

        if let Some(handle) = self.consumer_task.lock().await.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "consumer loop ended abnormally");
            }
        }

        if let Err(e) = self.producer.flush(FLUSH_TIMEOUT) {
            warn!(error = %e, "producer flush on close failed");
        }
        info!("kafka client closed");
    }
}

#[async_trait]
impl EventPublisher for KafkaClient {
    /// Serialize and send one event, waiting for broker acknowledgment.
    ///
    /// Returns the physical placement on success. The caller logs failures
    /// and carries on; the preceding storage mutation is never rolled back.
    async fn publish(&self, topic: &str, event: &StorageEvent) -> Result<PublishAck> {
        let payload = event.to_json()?;
        let record = FutureRecord::to(topic).payload(&payload).key(&event.path);

        match self.producer.send(record, SEND_TIMEOUT).await {
            Ok((partition, offset)) => {
                info!(
                    topic = topic,
                    partition = partition,
                    offset = offset,
                    event_type = %event.event_type,
                    "event published"
                );
                Ok(PublishAck { partition, offset })
            }
            Err((e, _)) => Err(EventBusError::Publish {
                topic: topic.to_string(),
                source: e,
            }),
        }
    }
}

fn compression_codec(code: i32) -> &'static str {
    match code {
        1 => "gzip",
        2 => "snappy",
        3 => "lz4",
        4 => "zstd",
        _ => "none",
    }
}
