//! JSON-file key-value store.
//!
//! The whole map is rewritten on every change: serialized to a sibling temp
//! file, then renamed over the original so readers never see a partial file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::Mutex;

use pulse_core::ports::{KeyValueStore, SettingsError};

use super::InMemoryKeyValueStore;

pub struct FileKeyValueStore {
    path: PathBuf,
    values: InMemoryKeyValueStore,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open the store at `path`. A missing file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        let values = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<HashMap<String, String>>(&bytes)
                .map_err(|e| SettingsError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SettingsError::Persist(e.to_string())),
        };

        tracing::info!(path = %path.display(), keys = values.len(), "Settings file loaded");

        Ok(Self {
            path,
            values: InMemoryKeyValueStore::with_values(values),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<(), SettingsError> {
        let json = serde_json::to_vec_pretty(values)
            .map_err(|e| SettingsError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsError::Persist(e.to_string()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| SettingsError::Persist(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SettingsError::Persist(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    fn observe(&self, key: &str) -> BoxStream<'static, Option<String>> {
        self.values.observe(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.values.snapshot();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;

        self.values.apply(key, value);
        tracing::debug!(key = %key, path = %self.path.display(), "Setting persisted");
        Ok(())
    }
}
