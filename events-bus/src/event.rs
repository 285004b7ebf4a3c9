use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;

/// The closed set of storage mutations carried over the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    FileUploaded,
    FileDeleted,
    FileAppended,
    DirectoryCreated,
    DirectoryDeleted,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FileUploaded => "FileUploaded",
            Self::FileDeleted => "FileDeleted",
            Self::FileAppended => "FileAppended",
            Self::DirectoryCreated => "DirectoryCreated",
            Self::DirectoryDeleted => "DirectoryDeleted",
        };
        f.write_str(name)
    }
}

/// Wire representation of a storage mutation.
///
/// Immutable after construction. Field names on the wire match the original
/// JSON contract (`id, type, path, size, timestamp, userId, metadata`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub path: String,
    #[serde(default, skip_serializing_if = "size_is_zero")]
    pub size: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "metadata_or_empty",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub metadata: HashMap<String, String>,
}

fn size_is_zero(size: &i64) -> bool {
    *size == 0
}

/// Consumers never see an unset map: a missing or null `metadata` decodes to
/// an empty mapping. Enforced on decode, not encode.
fn metadata_or_empty<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl StorageEvent {
    /// Construct an event stamped with the current time.
    pub fn new(event_type: EventType, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            path: path.into(),
            size: 0,
            timestamp: Utc::now(),
            user_id: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}
