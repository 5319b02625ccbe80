/// Notification preference stored in the local key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSetting {
    pub enabled: bool,
}

impl NotificationSetting {
    /// Key under which the flag is persisted.
    pub const KEY: &'static str = "notifications_enabled";

    /// Push topic toggled together with the flag.
    pub const TOPIC: &'static str = "global";

    /// Parse a stored value. Absent or unreadable values fall back to enabled.
    pub fn from_stored(value: Option<&str>) -> Self {
        let enabled = match value {
            Some("false") => false,
            Some("true") | None => true,
            Some(other) => {
                tracing::warn!(value = %other, "Unreadable notification setting, using default");
                true
            }
        };
        Self { enabled }
    }

    pub fn to_stored(self) -> &'static str {
        if self.enabled { "true" } else { "false" }
    }
}

impl Default for NotificationSetting {
    fn default() -> Self {
        Self { enabled: true }
    }
}
