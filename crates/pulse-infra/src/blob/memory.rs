//! In-memory blob store - used when no blob endpoint is configured.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use pulse_core::SourceError;
use pulse_core::ports::BlobStore;

const SCHEME: &str = "memory://";

/// Blob store keeping uploads in a map, addressed by `memory://<path>` URLs.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every upload fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Bytes stored under a URL previously returned by `put`.
    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        let path = url.strip_prefix(SCHEME)?;
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, SourceError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(SourceError::Network("Upload interrupted".to_string()));
        }
        self.blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.to_string(), bytes);
        Ok(format!("{SCHEME}{path}"))
    }
}
