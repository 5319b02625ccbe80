//! Blob storage port.

use async_trait::async_trait;

use crate::error::SourceError;

/// Write-only binary storage returning a stable retrieval URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, SourceError>;
}
