use crate::adapter::StorageAdapter;
use async_trait::async_trait;
use error_common::{StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory backend for development and testing.
///
/// Unlike the real backends this one is internally synchronized: every
/// operation takes the single reader/writer lock over the whole keyspace.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries (for tests).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn write(&self, path: &str, content: &[u8], overwrite: bool) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        if !overwrite && entries.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        entries.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let entries = self.entries.read().await;
        entries
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(path).is_none() {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().await;
        let match_all = prefix.is_empty() || prefix == ".";
        // Prefix is a directory: "docs" matches "docs/a.txt", not "docs2/b".
        let dir = prefix.trim_end_matches('/');
        Ok(entries
            .keys()
            .filter(|k| {
                match_all
                    || k.strip_prefix(dir)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .cloned()
            .collect())
    }
}
