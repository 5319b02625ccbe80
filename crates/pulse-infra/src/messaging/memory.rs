//! In-memory topic messaging.
//!
//! Records subscriptions locally. Stands in for a push backend, which this
//! client never talks to directly.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use pulse_core::ports::{MessagingError, TopicMessaging};

pub struct InMemoryTopicMessaging {
    topics: RwLock<HashSet<String>>,
    failing: AtomicBool,
}

impl InMemoryTopicMessaging {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashSet::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subscribe/unsubscribe call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub async fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.read().await.contains(topic)
    }
}

impl Default for InMemoryTopicMessaging {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TopicMessaging for InMemoryTopicMessaging {
    async fn subscribe(&self, topic: &str) -> Result<(), MessagingError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(MessagingError::SubscribeError(topic.to_string()));
        }
        self.topics.write().await.insert(topic.to_string());
        tracing::info!(topic = %topic, "Subscribed to topic");
        Ok(())
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), MessagingError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(MessagingError::UnsubscribeError(topic.to_string()));
        }
        self.topics.write().await.remove(topic);
        tracing::info!(topic = %topic, "Unsubscribed from topic");
        Ok(())
    }
}
