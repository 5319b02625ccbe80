//! Comment data source port.

use async_trait::async_trait;

use super::LiveQuery;
use crate::domain::{Comment, Direction};
use crate::error::SourceError;

/// Remote source of comments, grouped by parent post.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Observe the comments of a post ordered by creation time.
    fn observe_comments(&self, post_id: &str, direction: Direction) -> LiveQuery<Vec<Comment>>;

    /// Observe a single comment of a post.
    fn observe_comment(&self, post_id: &str, comment_id: &str) -> LiveQuery<Option<Comment>>;

    /// Write a comment under `post_id`. Checks connectivity first.
    async fn add_comment(&self, post_id: &str, comment: Comment) -> Result<(), SourceError>;
}
