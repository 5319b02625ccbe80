use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;

use crate::domain::NotificationSetting;
use crate::ports::{KeyValueStore, SettingsError};

/// Settings repository - the notification flag over the local key-value store.
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Live notification flag, `true` when nothing has been stored yet.
    pub fn notifications_enabled(&self) -> BoxStream<'static, bool> {
        self.store
            .observe(NotificationSetting::KEY)
            .map(|value| NotificationSetting::from_stored(value.as_deref()).enabled)
            .boxed()
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        let setting = NotificationSetting { enabled };
        self.store
            .set(NotificationSetting::KEY, setting.to_stored())
            .await
    }
}
