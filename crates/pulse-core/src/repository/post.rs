use std::sync::Arc;

use crate::domain::{Direction, Post};
use crate::error::DomainError;
use crate::ports::{LiveQuery, PostSource};

/// Post repository - forwards to the source and uploads photos before writing.
pub struct PostRepository {
    source: Arc<dyn PostSource>,
}

impl PostRepository {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self { source }
    }

    pub fn posts(&self, direction: Direction) -> LiveQuery<Vec<Post>> {
        self.source.observe_posts(direction)
    }

    pub fn post(&self, id: &str) -> LiveQuery<Option<Post>> {
        self.source.observe_post(id)
    }

    /// Persist a post and return the record as written.
    ///
    /// A local photo is uploaded first and replaced by its URL. When the upload
    /// fails the post is written without a photo if its description alone keeps
    /// it valid; otherwise the add fails with [`DomainError::ImageUpload`] and
    /// nothing is written.
    pub async fn add_post(&self, mut post: Post) -> Result<Post, DomainError> {
        post.validate()?;

        if post.has_local_photo() {
            let local = post.photo_url.take().unwrap_or_default();
            match self.source.upload_image(&local).await {
                Some(url) => post.photo_url = Some(url),
                None if post.has_description() => {
                    tracing::warn!(post_id = %post.id, "Image upload failed, posting without photo");
                }
                None => {
                    tracing::error!(post_id = %post.id, "Image upload failed, post has no other content");
                    return Err(DomainError::ImageUpload);
                }
            }
        }

        self.source.add_post(post.clone()).await?;
        tracing::debug!(post_id = %post.id, photo = ?post.photo_url, "Post written");
        Ok(post)
    }
}
