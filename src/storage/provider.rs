use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::Result;

/// Object store trait
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Idempotent creation of the backing container; no-op if it exists
    async fn ensure_container(&self) -> Result<()>;

    /// Write data under `id`, overwriting any existing content
    async fn put(&self, id: &str, data: Bytes) -> Result<()>;

    /// Read the bytes stored under `id`
    async fn get(&self, id: &str) -> Result<Bytes>;

    /// Check if a blob exists
    async fn exists(&self, id: &str) -> Result<bool>;

    /// Remove the blob if present; absent is a no-op, never an error
    async fn delete_if_exists(&self, id: &str) -> Result<()>;

    /// Get a signed download link valid for `expires`.
    /// Returns None when the blob does not exist so that listing can
    /// degrade to a dead link instead of failing.
    async fn read_link(&self, id: &str, expires: Duration) -> Result<Option<String>>;

    /// Get the store type name
    fn store_type(&self) -> &'static str;
}
