//! Document collections - the backends behind the post, comment and user sources.

mod memory;

pub use memory::{InMemoryCollection, InMemoryCollections};

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisBackend, RedisCollection, RedisConfig};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use pulse_core::SourceError;
use pulse_core::domain::{Comment, Direction, Post, User};
use pulse_core::ports::LiveQuery;

/// A record stored in a collection, keyed by id and ordered by creation time.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Ordering score, milliseconds since the epoch.
    fn sort_key(&self) -> i64;
}

impl Document for Post {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

impl Document for Comment {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

impl Document for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        0
    }
}

/// A collection of documents with live queries and whole-document upserts.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    fn watch_all(&self, direction: Direction) -> LiveQuery<Vec<T>>;

    fn watch_one(&self, id: &str) -> LiveQuery<Option<T>>;

    async fn upsert(&self, doc: T) -> Result<(), SourceError>;

    async fn contains(&self, id: &str) -> Result<bool, SourceError>;

    async fn remove(&self, id: &str) -> Result<(), SourceError>;
}

/// Opens named collections, e.g. one comment collection per post.
pub trait CollectionProvider<T: Document>: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn Collection<T>>;
}

/// Sort documents by creation time, ties broken by id.
pub(crate) fn sort_documents<T: Document>(docs: &mut [T], direction: Direction) {
    docs.sort_by(|a, b| (a.sort_key(), a.id()).cmp(&(b.sort_key(), b.id())));
    if direction == Direction::Descending {
        docs.reverse();
    }
}
