use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to publish event to topic {topic}: {source}")]
    Publish {
        topic: String,
        source: rdkafka::error::KafkaError,
    },

    #[error("broker client error: {0}")]
    Broker(#[from] rdkafka::error::KafkaError),

    #[error("subscription failed: {0}")]
    Subscribe(String),

    #[error("handler failed: {0}")]
    Handler(String),
}

pub type Result<T> = std::result::Result<T, EventBusError>;
