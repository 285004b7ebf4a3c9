use crate::adapter::StorageAdapter;
use async_trait::async_trait;
use error_common::{StorageError, StorageResult};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Local filesystem backend. All entries live under a base directory.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve a storage-relative path under the base directory. `..`
    /// components would escape the base and are rejected outright.
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let relative = path.trim_start_matches('/');
        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::Backend(format!(
                "path escapes storage root: {}",
                path
            )));
        }
        Ok(self.base_path.join(relative))
    }

    /// Walk `dir` recursively, collecting file paths relative to the base.
    async fn collect_files(&self, dir: PathBuf, out: &mut Vec<String>) -> StorageResult<()> {
        let mut pending = vec![dir];
        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current)
                .await
                .map_err(|e| StorageError::Backend(format!("failed to list files: {}", e)))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::Backend(format!("failed to list files: {}", e)))?
            {
                let entry_path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StorageError::Backend(format!("failed to list files: {}", e)))?;
                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if let Ok(rel) = entry_path.strip_prefix(&self.base_path) {
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for LocalStorage {
    async fn write(&self, path: &str, content: &[u8], overwrite: bool) -> StorageResult<()> {
        let full_path = self.full_path(path)?;

        if let Some(dir) = full_path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StorageError::Backend(format!("failed to create directories: {}", e)))?;
        }

        if !overwrite && fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        fs::write(&full_path, content)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to save file: {}", e)))?;

        debug!(path = %path, size = content.len(), overwrite = overwrite, "file written");
        Ok(())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;

        if !fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        fs::read(&full_path)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to read file: {}", e)))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(path)?;

        if !fs::try_exists(&full_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(path.to_string()));
        }

        fs::remove_file(&full_path)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to delete file: {}", e)))?;

        debug!(path = %path, "file deleted");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = if prefix.is_empty() || prefix == "." {
            self.base_path.clone()
        } else {
            self.full_path(prefix)?
        };

        if !fs::try_exists(&root).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        self.collect_files(root, &mut files).await?;
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        (dir, storage)
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let (_dir, storage) = storage();
        storage.write("a/b/c.txt", b"hello", false).await.unwrap();
        assert_eq!(storage.read("a/b/c.txt").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn write_without_overwrite_preserves_existing_content() {
        let (_dir, storage) = storage();
        storage.write("f.txt", b"first", false).await.unwrap();

        let err = storage.write("f.txt", b"second", false).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(storage.read("f.txt").await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn overwrite_replaces_content() {
        let (_dir, storage) = storage();
        storage.write("f.txt", b"first", false).await.unwrap();
        storage.write("f.txt", b"second", true).await.unwrap();
        assert_eq!(storage.read("f.txt").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let (_dir, storage) = storage();
        storage.write("f.txt", b"x", false).await.unwrap();
        storage.delete("f.txt").await.unwrap();

        assert!(matches!(
            storage.read("f.txt").await.unwrap_err(),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            storage.delete("f.txt").await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_returns_each_path_exactly_once() {
        let (_dir, storage) = storage();
        storage.write("docs/a.txt", b"1", false).await.unwrap();
        storage.write("docs/sub/b.txt", b"2", false).await.unwrap();
        storage.write("other/c.txt", b"3", false).await.unwrap();

        let mut all = storage.list(".").await.unwrap();
        all.sort();
        assert_eq!(all, vec!["docs/a.txt", "docs/sub/b.txt", "other/c.txt"]);

        let mut docs = storage.list("docs").await.unwrap();
        docs.sort();
        assert_eq!(docs, vec!["docs/a.txt", "docs/sub/b.txt"]);
    }

    #[tokio::test]
    async fn list_of_absent_prefix_is_empty() {
        let (_dir, storage) = storage();
        assert!(storage.list("nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn parent_traversal_cannot_escape_the_base_directory() {
        let (_dir, storage) = storage();
        assert!(storage.write("../escape.txt", b"x", false).await.is_err());
        assert!(storage.read("a/../../escape.txt").await.is_err());
        assert!(storage.delete("..").await.is_err());
        assert!(storage.list("../..").await.is_err());
    }

    #[tokio::test]
    async fn upload_is_write_without_overwrite() {
        let (_dir, storage) = storage();
        storage.upload("u.txt", b"once").await.unwrap();
        assert!(matches!(
            storage.upload("u.txt", b"twice").await.unwrap_err(),
            StorageError::AlreadyExists(_)
        ));
    }
}
