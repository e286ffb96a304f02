use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::storage::{LinkSigner, ObjectStore};

/// Local file system object store.
///
/// Blobs live as flat files named by id inside the container directory;
/// download links point back at this process's `/objects/:id` route,
/// signed with the configured secret.
pub struct LocalStore {
    base_path: PathBuf,
    public_url: String,
    signer: LinkSigner,
}

impl LocalStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            base_path: PathBuf::from(&config.local_path),
            public_url: config.public_url.trim_end_matches('/').to_string(),
            signer: LinkSigner::new(&config.link_secret),
        }
    }

    fn blob_path(&self, id: &str) -> Result<PathBuf> {
        // Ids are generated UUIDs; anything path-like is rejected
        if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(AppError::BadRequest("Invalid object id".to_string()));
        }
        Ok(self.base_path.join(id))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn ensure_container(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            AppError::StoreUnavailable(format!(
                "Failed to create container {:?}: {}",
                self.base_path, e
            ))
        })?;
        Ok(())
    }

    async fn put(&self, id: &str, data: Bytes) -> Result<()> {
        let full_path = self.blob_path(id)?;

        let mut file = fs::File::create(&full_path).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to create blob {}: {}", id, e))
        })?;
        file.write_all(&data)
            .await
            .map_err(|e| AppError::WriteFailed(format!("Failed to write blob {}: {}", id, e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::WriteFailed(format!("Failed to flush blob {}: {}", id, e)))?;

        tracing::debug!("Saved blob to {:?}", full_path);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Bytes> {
        let full_path = self.blob_path(id)?;

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("Blob not found: {}", id))
            } else {
                AppError::StoreUnavailable(format!("Failed to read blob {}: {}", id, e))
            }
        })?;

        Ok(Bytes::from(data))
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let full_path = self.blob_path(id)?;
        Ok(full_path.exists())
    }

    async fn delete_if_exists(&self, id: &str) -> Result<()> {
        let full_path = self.blob_path(id)?;

        if full_path.exists() {
            fs::remove_file(&full_path).await?;
            tracing::debug!("Deleted blob {:?}", full_path);
        }

        Ok(())
    }

    async fn read_link(&self, id: &str, expires: Duration) -> Result<Option<String>> {
        if !self.exists(id).await? {
            return Ok(None);
        }

        let object_path = format!("/objects/{}", id);
        let signed = self.signer.sign(&object_path, expires.as_secs().max(1) as i64);
        let url = format!(
            "{}{}?sign-time={}&signature={}",
            self.public_url, object_path, signed.key_time, signed.signature
        );

        Ok(Some(url))
    }

    fn store_type(&self) -> &'static str {
        "local"
    }
}
