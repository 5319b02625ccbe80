//! Post data source port.

use async_trait::async_trait;

use super::LiveQuery;
use crate::domain::{Direction, Post};
use crate::error::SourceError;

/// Remote source of posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Observe every post ordered by creation time.
    fn observe_posts(&self, direction: Direction) -> LiveQuery<Vec<Post>>;

    /// Observe a single post. Emits `None` while the id does not exist.
    fn observe_post(&self, id: &str) -> LiveQuery<Option<Post>>;

    /// Write a post. Fails with [`SourceError::Offline`] before any backend
    /// round-trip when the network is unavailable.
    async fn add_post(&self, post: Post) -> Result<(), SourceError>;

    /// Upload a local image and return its retrieval URL.
    /// Failures are logged and reported as `None`.
    async fn upload_image(&self, local_ref: &str) -> Option<String>;
}
