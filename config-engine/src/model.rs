use serde::Deserialize;

/// Top-level configuration. Field names mirror the YAML keys consumed by the
/// deployment tooling, so renames are spelled out rather than derived.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub s3: S3Config,
    pub local: LocalConfig,
    pub kafka: KafkaConfig,
    pub logging: LoggingConfig,
    pub worker: WorkerConfig,
}

/// HTTP server bind address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Object-store credentials. Absence of credentials is the signal to fall
/// back to the local backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct S3Config {
    #[serde(rename = "accessKey")]
    pub access_key: String,
    #[serde(rename = "secretKey")]
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO etc.)
    pub endpoint: Option<String>,
}

impl S3Config {
    pub fn is_configured(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }
}

/// Local filesystem backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    #[serde(rename = "basePath")]
    pub base_path: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_path: "./local_data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    #[serde(rename = "consumerGroup")]
    pub consumer_group: String,
    pub topics: TopicsConfig,
    pub producer: ProducerConfig,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            consumer_group: "blobsync-workers".to_string(),
            topics: TopicsConfig::default(),
            producer: ProducerConfig::default(),
        }
    }
}

/// Topic names. The producer and the consumer subscription share the single
/// `storageEvents` key so the two sides cannot silently diverge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    #[serde(rename = "storageEvents")]
    pub storage_events: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            storage_events: "storage-events".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// -1 waits for all in-sync replicas
    #[serde(rename = "requiredAcks")]
    pub required_acks: i32,
    pub retries: u32,
    /// 0 = none, matching the broker's codec table
    pub compression: i32,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            required_acks: -1,
            retries: 5,
            compression: 0,
        }
    }
}

/// Log-shipping target. Optional; when unset logs stay on stderr only.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(rename = "endpointUrl")]
    pub endpoint_url: Option<String>,
}

/// Worker-side settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Where the worker keeps its replica when running on the local backend
    #[serde(rename = "replicaBasePath")]
    pub replica_base_path: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            replica_base_path: "./replica_data".to_string(),
        }
    }
}
