use async_trait::async_trait;
use error_common::StorageResult;

/// Uniform contract over concrete file-storage backends.
///
/// Paths are storage-relative; `list` returns paths relative to the backend
/// root, in no particular order and with no duplicates.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Write `content` at `path`, creating parent hierarchy as needed.
    ///
    /// With `overwrite = false` an existing entry fails with
    /// [`StorageError::AlreadyExists`](error_common::StorageError::AlreadyExists)
    /// and nothing is changed.
    async fn write(&self, path: &str, content: &[u8], overwrite: bool) -> StorageResult<()>;

    /// Return the full content at `path`, or `NotFound`.
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Remove the entry at `path`, or `NotFound` if absent.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// List entry paths under `prefix`. Callers must not rely on order.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Convenience alias for `write(path, content, false)`.
    async fn upload(&self, path: &str, content: &[u8]) -> StorageResult<()> {
        self.write(path, content, false).await
    }
}
