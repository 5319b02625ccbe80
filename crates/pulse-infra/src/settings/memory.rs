//! In-memory key-value store - the fallback when no settings file is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::watch;

use pulse_core::ports::{KeyValueStore, SettingsError};

use crate::live::watch_stream;

/// Key-value store publishing every change through a watch channel.
///
/// Data is lost on process restart.
pub struct InMemoryKeyValueStore {
    values: watch::Sender<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::with_values(HashMap::new())
    }

    pub fn with_values(values: HashMap<String, String>) -> Self {
        let (values, _) = watch::channel(values);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub(crate) fn snapshot(&self) -> HashMap<String, String> {
        self.values.borrow().clone()
    }

    /// Store `value`, waking observers only when it actually changed.
    pub(crate) fn apply(&self, key: &str, value: &str) {
        self.values.send_if_modified(|values| {
            if values.get(key).map(String::as_str) == Some(value) {
                return false;
            }
            values.insert(key.to_string(), value.to_string());
            true
        });
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    fn observe(&self, key: &str) -> BoxStream<'static, Option<String>> {
        let key = key.to_string();
        watch_stream(self.values.subscribe(), move |values: &HashMap<String, String>| {
            values.get(&key).cloned()
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.apply(key, value);
        tracing::debug!(key = %key, value = %value, "Setting stored");
        Ok(())
    }
}
