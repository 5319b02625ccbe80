use std::sync::Arc;

use async_trait::async_trait;

use pulse_core::SourceError;
use pulse_core::domain::{Comment, Direction};
use pulse_core::ports::{CommentSource, LiveQuery, NetworkMonitor};

use super::comments_collection;
use crate::store::CollectionProvider;

/// Comment source keeping one collection per parent post.
pub struct DocumentCommentSource {
    comments: Arc<dyn CollectionProvider<Comment>>,
    network: Arc<dyn NetworkMonitor>,
}

impl DocumentCommentSource {
    pub fn new(
        comments: Arc<dyn CollectionProvider<Comment>>,
        network: Arc<dyn NetworkMonitor>,
    ) -> Self {
        Self { comments, network }
    }
}

#[async_trait]
impl CommentSource for DocumentCommentSource {
    fn observe_comments(&self, post_id: &str, direction: Direction) -> LiveQuery<Vec<Comment>> {
        self.comments
            .collection(&comments_collection(post_id))
            .watch_all(direction)
    }

    fn observe_comment(&self, post_id: &str, comment_id: &str) -> LiveQuery<Option<Comment>> {
        self.comments
            .collection(&comments_collection(post_id))
            .watch_one(comment_id)
    }

    async fn add_comment(&self, post_id: &str, mut comment: Comment) -> Result<(), SourceError> {
        if !self.network.is_available().await {
            tracing::warn!(post_id = %post_id, "Refusing to write comment while offline");
            return Err(SourceError::Offline);
        }
        comment.post_id = post_id.to_string();
        self.comments
            .collection(&comments_collection(post_id))
            .upsert(comment)
            .await
    }
}
