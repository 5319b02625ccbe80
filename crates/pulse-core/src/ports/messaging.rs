//! Push-topic messaging port.

use async_trait::async_trait;

/// Topic subscription - abstraction over push notification backends.
#[async_trait]
pub trait TopicMessaging: Send + Sync {
    async fn subscribe(&self, topic: &str) -> Result<(), MessagingError>;

    async fn unsubscribe(&self, topic: &str) -> Result<(), MessagingError>;
}

/// Messaging errors.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Failed to subscribe: {0}")]
    SubscribeError(String),

    #[error("Failed to unsubscribe: {0}")]
    UnsubscribeError(String),
}
