//! Local key-value store port.

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Key-value store - abstraction over on-device preference backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Observe a key. Emits the current value first, then every change.
    fn observe(&self, key: &str) -> BoxStream<'static, Option<String>>;

    /// Atomically replace the value of a key.
    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to persist settings: {0}")]
    Persist(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
