use std::sync::Arc;

use crate::domain::{Comment, Direction};
use crate::error::DomainError;
use crate::ports::{CommentSource, LiveQuery};

/// Comment repository - a pass-through over the comment source.
pub struct CommentRepository {
    source: Arc<dyn CommentSource>,
}

impl CommentRepository {
    pub fn new(source: Arc<dyn CommentSource>) -> Self {
        Self { source }
    }

    /// Comments of a post, oldest first.
    pub fn comments(&self, post_id: &str) -> LiveQuery<Vec<Comment>> {
        self.source.observe_comments(post_id, Direction::Ascending)
    }

    pub fn comment(&self, post_id: &str, comment_id: &str) -> LiveQuery<Option<Comment>> {
        self.source.observe_comment(post_id, comment_id)
    }

    pub async fn add_comment(&self, post_id: &str, comment: Comment) -> Result<Comment, DomainError> {
        comment.validate()?;
        self.source.add_comment(post_id, comment.clone()).await?;
        tracing::debug!(post_id = %post_id, comment_id = %comment.id, "Comment written");
        Ok(comment)
    }
}
