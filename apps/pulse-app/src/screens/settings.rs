use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use pulse_core::domain::NotificationSetting;
use pulse_core::ports::TopicMessaging;
use pulse_core::repository::SettingsRepository;
use pulse_shared::Notice;

use super::{LiveSlot, Notices, follow};
use crate::state::AppState;

/// Notification preference.
pub struct SettingsScreen {
    settings: Arc<SettingsRepository>,
    messaging: Arc<dyn TopicMessaging>,
    notifications: Arc<watch::Sender<bool>>,
    notices: Notices,
    slot: LiveSlot,
}

impl SettingsScreen {
    pub fn open(app: &AppState) -> Self {
        let screen = Self {
            settings: app.settings.clone(),
            messaging: app.messaging.clone(),
            notifications: Arc::new(watch::channel(NotificationSetting::default().enabled).0),
            notices: Notices::new(),
            slot: LiveSlot::new(),
        };
        follow(
            &screen.slot,
            &screen.notifications,
            screen.settings.notifications_enabled(),
        );
        screen
    }

    pub fn notifications_enabled(&self) -> watch::Receiver<bool> {
        self.notifications.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    /// Persist the preference, then follow it on the push topic.
    ///
    /// A topic failure is logged only; the stored preference stands.
    pub async fn toggle(&self, enabled: bool) {
        if let Err(e) = self.settings.set_notifications_enabled(enabled).await {
            tracing::error!(error = %e, "Failed to store notification preference");
            self.notices.emit(Notice::Failure(e.to_string()));
            return;
        }

        let topic = NotificationSetting::TOPIC;
        let result = if enabled {
            self.messaging.subscribe(topic).await
        } else {
            self.messaging.unsubscribe(topic).await
        };
        if let Err(e) = result {
            tracing::error!(topic = %topic, enabled, error = %e, "Topic update failed");
        }
    }
}
