use crate::adapter::StorageAdapter;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use error_common::{StorageError, StorageResult};
use tracing::debug;

/// S3-compatible object store backend.
///
/// Keys map 1:1 to storage paths; "directories" exist only as key prefixes.
/// The overwrite check is a separate head request, not atomic with the put —
/// concurrent writers to the same key race, last writer wins.
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a backend from static credentials.
    ///
    /// `endpoint` switches to path-style addressing for S3-compatible stores
    /// such as MinIO.
    pub async fn from_config(cfg: &config_engine::S3Config) -> StorageResult<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            cfg.access_key.clone(),
            cfg.secret_key.clone(),
            None,
            None,
            "blobsync-config",
        );

        let sdk_config = aws_config::from_env()
            .region(aws_config::Region::new(cfg.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self::new(
            S3Client::from_conf(builder.build()),
            cfg.bucket.clone(),
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::Backend(format!(
                        "failed to stat object: {}",
                        service_err
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl StorageAdapter for S3Storage {
    async fn write(&self, path: &str, content: &[u8], overwrite: bool) -> StorageResult<()> {
        if !overwrite && self.exists(path).await? {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(Bytes::copy_from_slice(content)))
            .content_type("application/octet-stream")
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to upload object: {}", e)))?;

        debug!(key = %path, size = content.len(), "object uploaded");
        Ok(())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound(path.to_string())
                } else {
                    StorageError::Backend(format!("failed to read object: {}", service_err))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to read object body: {}", e)))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        // S3 deletes are idempotent, so surface NotFound ourselves to keep
        // the adapter contract uniform across backends.
        if !self.exists(path).await? {
            return Err(StorageError::NotFound(path.to_string()));
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("failed to delete object: {}", e)))?;

        debug!(key = %path, "object deleted");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let effective_prefix = if prefix == "." { "" } else { prefix };

        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(effective_prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| StorageError::Backend(format!("failed to list objects: {}", e)))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }
        }

        Ok(keys)
    }
}
