//! In-memory wiring for screen tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::watch;

use pulse_core::SourceError;
use pulse_core::domain::{Comment, Direction, Post, User};
use pulse_core::ports::{CommentSource, LiveQuery, NetworkMonitor, PostSource};
use pulse_core::repository::{
    CommentRepository, PostRepository, SettingsRepository, UserRepository,
};
use pulse_infra::source::{POSTS_COLLECTION, USERS_COLLECTION, comments_collection};
use pulse_infra::{
    Argon2PasswordService, DocumentCommentSource, DocumentPostSource, DocumentUserStore,
    InMemoryBlobStore, InMemoryCollection, InMemoryCollections, InMemoryKeyValueStore,
    InMemoryTopicMessaging, JwtConfig, JwtTokenService, LocalAuthProvider, StaticNetworkMonitor,
};

use crate::state::AppState;

/// Post source wrapper counting every call that reaches the adapter.
pub struct CountingPostSource {
    inner: DocumentPostSource,
    pub writes: AtomicUsize,
    pub uploads: AtomicUsize,
}

#[async_trait]
impl PostSource for CountingPostSource {
    fn observe_posts(&self, direction: Direction) -> LiveQuery<Vec<Post>> {
        self.inner.observe_posts(direction)
    }

    fn observe_post(&self, id: &str) -> LiveQuery<Option<Post>> {
        self.inner.observe_post(id)
    }

    async fn add_post(&self, post: Post) -> Result<(), SourceError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.add_post(post).await
    }

    async fn upload_image(&self, local_ref: &str) -> Option<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.inner.upload_image(local_ref).await
    }
}

/// Comment source wrapper recording every `add_comment` call.
pub struct RecordingCommentSource {
    inner: DocumentCommentSource,
    pub calls: Mutex<Vec<(String, Comment)>>,
}

impl RecordingCommentSource {
    pub fn calls(&self) -> Vec<(String, Comment)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentSource for RecordingCommentSource {
    fn observe_comments(&self, post_id: &str, direction: Direction) -> LiveQuery<Vec<Comment>> {
        self.inner.observe_comments(post_id, direction)
    }

    fn observe_comment(&self, post_id: &str, comment_id: &str) -> LiveQuery<Option<Comment>> {
        self.inner.observe_comment(post_id, comment_id)
    }

    async fn add_comment(&self, post_id: &str, comment: Comment) -> Result<(), SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((post_id.to_string(), comment.clone()));
        self.inner.add_comment(post_id, comment).await
    }
}

/// Connectivity check that suspends once before answering "online",
/// like a real probe does.
pub struct YieldingNetwork;

#[async_trait]
impl NetworkMonitor for YieldingNetwork {
    async fn is_available(&self) -> bool {
        tokio::task::yield_now().await;
        true
    }
}

pub struct Fixture {
    pub app: AppState,
    pub network: Arc<StaticNetworkMonitor>,
    pub posts: Arc<InMemoryCollection<Post>>,
    pub comments: Arc<InMemoryCollections<Comment>>,
    pub users: Arc<InMemoryCollection<User>>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub key_value: Arc<InMemoryKeyValueStore>,
    pub messaging: Arc<InMemoryTopicMessaging>,
    pub post_source: Arc<CountingPostSource>,
    pub comment_source: Arc<RecordingCommentSource>,
}

impl Fixture {
    /// The fixture's app with a connectivity check that suspends.
    pub fn app_with_yielding_network(&self) -> AppState {
        AppState {
            network: Arc::new(YieldingNetwork),
            ..self.app.clone()
        }
    }

    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    pub fn with_posts(seed: impl IntoIterator<Item = Post>) -> Self {
        let network = Arc::new(StaticNetworkMonitor::new(true));
        let posts = Arc::new(InMemoryCollection::new(POSTS_COLLECTION).with_documents(seed));
        let comments = Arc::new(InMemoryCollections::new());
        let users = Arc::new(InMemoryCollection::new(USERS_COLLECTION));
        let blobs = Arc::new(InMemoryBlobStore::new());
        let key_value = Arc::new(InMemoryKeyValueStore::new());
        let messaging = Arc::new(InMemoryTopicMessaging::new());

        let post_source = Arc::new(CountingPostSource {
            inner: DocumentPostSource::new(posts.clone(), network.clone(), blobs.clone()),
            writes: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
        });
        let comment_source = Arc::new(RecordingCommentSource {
            inner: DocumentCommentSource::new(comments.clone(), network.clone()),
            calls: Mutex::new(Vec::new()),
        });
        let auth = Arc::new(LocalAuthProvider::new(
            Arc::new(JwtTokenService::new(JwtConfig {
                secret: "fixture-secret".to_string(),
                expiration_hours: 1,
                issuer: "pulse-test".to_string(),
            })),
            Arc::new(Argon2PasswordService::new()),
        ));

        let app = AppState {
            posts: Arc::new(PostRepository::new(post_source.clone())),
            comments: Arc::new(CommentRepository::new(comment_source.clone())),
            users: Arc::new(UserRepository::new(
                auth,
                Arc::new(DocumentUserStore::new(users.clone())),
            )),
            settings: Arc::new(SettingsRepository::new(key_value.clone())),
            network: network.clone(),
            messaging: messaging.clone(),
        };

        Self {
            app,
            network,
            posts,
            comments,
            users,
            blobs,
            key_value,
            messaging,
            post_source,
            comment_source,
        }
    }

    pub fn comment_collection(&self, post_id: &str) -> Arc<InMemoryCollection<Comment>> {
        self.comments.get(&comments_collection(post_id))
    }

    pub fn post_writes(&self) -> usize {
        self.post_source.writes.load(Ordering::SeqCst)
    }

    pub fn post_uploads(&self) -> usize {
        self.post_source.uploads.load(Ordering::SeqCst)
    }
}

pub fn post(id: &str, secs: i64) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        description: Some("Improve your goldfish's physical fitness.".to_string()),
        photo_url: None,
        created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        author: None,
    }
}

pub fn comment(id: &str, post_id: &str, secs: i64) -> Comment {
    Comment {
        id: id.to_string(),
        post_id: post_id.to_string(),
        content: format!("Comment {id}"),
        created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        author: None,
    }
}

/// Wait until `rx` holds a value matching `predicate` and return it.
pub async fn settle<T: Clone>(rx: &mut watch::Receiver<T>, predicate: impl FnMut(&T) -> bool) -> T {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("state did not settle in time")
        .expect("state channel closed")
        .clone()
}
