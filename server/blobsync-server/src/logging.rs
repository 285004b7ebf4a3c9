use serde::Serialize;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber. `RUST_LOG` overrides the default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    timestamp: String,
}

/// Ships selected log records to an HTTP collector.
///
/// Constructed once from config in the composition root and passed where
/// needed; when no endpoint is configured every call is a no-op. Shipping is
/// best-effort and never blocks the caller's request path beyond the client
/// timeout.
#[derive(Clone)]
pub struct LogShipper {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl LogShipper {
    pub fn from_config(cfg: &config_engine::LoggingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            endpoint: cfg.endpoint_url.clone(),
            client,
        }
    }

    pub async fn ship(&self, level: &str, message: &str, error: Option<&str>) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };
        let record = LogRecord {
            level,
            message,
            error,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.client.post(endpoint).json(&record).send().await {
            warn!(error = %e, "log shipping failed");
        }
    }
}
