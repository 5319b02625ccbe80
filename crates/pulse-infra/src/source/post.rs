use std::sync::Arc;

use async_trait::async_trait;

use pulse_core::SourceError;
use pulse_core::domain::{Direction, Post};
use pulse_core::ports::{BlobStore, LiveQuery, NetworkMonitor, PostSource};

use crate::blob::upload_local_image;
use crate::store::Collection;

/// Post source backed by a document collection and a blob store for photos.
pub struct DocumentPostSource {
    posts: Arc<dyn Collection<Post>>,
    network: Arc<dyn NetworkMonitor>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentPostSource {
    pub fn new(
        posts: Arc<dyn Collection<Post>>,
        network: Arc<dyn NetworkMonitor>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            posts,
            network,
            blobs,
        }
    }
}

#[async_trait]
impl PostSource for DocumentPostSource {
    fn observe_posts(&self, direction: Direction) -> LiveQuery<Vec<Post>> {
        self.posts.watch_all(direction)
    }

    fn observe_post(&self, id: &str) -> LiveQuery<Option<Post>> {
        self.posts.watch_one(id)
    }

    async fn add_post(&self, post: Post) -> Result<(), SourceError> {
        if !self.network.is_available().await {
            tracing::warn!(post_id = %post.id, "Refusing to write post while offline");
            return Err(SourceError::Offline);
        }
        self.posts.upsert(post).await
    }

    async fn upload_image(&self, local_ref: &str) -> Option<String> {
        upload_local_image(self.blobs.as_ref(), local_ref).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::blob::InMemoryBlobStore;
    use crate::network::StaticNetworkMonitor;
    use crate::store::InMemoryCollection;

    fn post() -> Post {
        Post {
            id: "p1".to_string(),
            title: "The Door's Game".to_string(),
            description: Some("text".to_string()),
            photo_url: None,
            created_at: Utc::now(),
            author: None,
        }
    }

    #[tokio::test]
    async fn test_offline_write_never_reaches_collection() {
        let posts = Arc::new(InMemoryCollection::new("posts"));
        let network = Arc::new(StaticNetworkMonitor::new(false));
        let source = DocumentPostSource::new(
            posts.clone(),
            network,
            Arc::new(InMemoryBlobStore::new()),
        );

        let err = source.add_post(post()).await.unwrap_err();

        assert_eq!(err, SourceError::Offline);
        assert_eq!(posts.writes(), 0);
    }

    #[tokio::test]
    async fn test_online_write_is_stored() {
        let posts = Arc::new(InMemoryCollection::new("posts"));
        let source = DocumentPostSource::new(
            posts.clone(),
            Arc::new(StaticNetworkMonitor::new(true)),
            Arc::new(InMemoryBlobStore::new()),
        );

        source.add_post(post()).await.unwrap();

        assert_eq!(posts.writes(), 1);
        assert!(posts.contains("p1").await.unwrap());
    }
}
