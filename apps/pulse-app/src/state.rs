//! Application state - the composition root shared by every screen.

use std::sync::Arc;

use pulse_core::domain::{Comment, Post, User};
use pulse_core::ports::{
    AuthProvider, BlobStore, KeyValueStore, NetworkMonitor, TopicMessaging,
};
use pulse_core::repository::{
    CommentRepository, PostRepository, SettingsRepository, UserRepository,
};
use pulse_infra::source::{POSTS_COLLECTION, USERS_COLLECTION};
use pulse_infra::{
    Argon2PasswordService, Collection, CollectionProvider, DocumentCommentSource,
    DocumentPostSource, DocumentUserStore, FileKeyValueStore, InMemoryBlobStore,
    InMemoryCollection, InMemoryCollections, InMemoryKeyValueStore, InMemoryTopicMessaging,
    JwtTokenService, LocalAuthProvider, StaticNetworkMonitor,
};

use crate::config::{AppConfig, Backend};
use crate::seed;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostRepository>,
    pub comments: Arc<CommentRepository>,
    pub users: Arc<UserRepository>,
    pub settings: Arc<SettingsRepository>,
    pub network: Arc<dyn NetworkMonitor>,
    pub messaging: Arc<dyn TopicMessaging>,
}

struct Collections {
    posts: Arc<dyn Collection<Post>>,
    comments: Arc<dyn CollectionProvider<Comment>>,
    users: Arc<dyn Collection<User>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let collections = open_collections(config).await;
        let network = network_monitor(config)?;
        let blobs = blob_store(config)?;

        let key_value: Arc<dyn KeyValueStore> = match &config.settings_path {
            Some(path) => Arc::new(FileKeyValueStore::open(path.clone()).await?),
            None => {
                tracing::info!("SETTINGS_PATH not set. Preferences are kept in memory.");
                Arc::new(InMemoryKeyValueStore::new())
            }
        };

        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
        ));

        if config.seed {
            seed::seed_demo_content(collections.posts.as_ref(), collections.comments.as_ref())
                .await?;
        }

        let state = Self {
            posts: Arc::new(PostRepository::new(Arc::new(DocumentPostSource::new(
                collections.posts,
                network.clone(),
                blobs,
            )))),
            comments: Arc::new(CommentRepository::new(Arc::new(DocumentCommentSource::new(
                collections.comments,
                network.clone(),
            )))),
            users: Arc::new(UserRepository::new(
                auth,
                Arc::new(DocumentUserStore::new(collections.users)),
            )),
            settings: Arc::new(SettingsRepository::new(key_value)),
            network,
            messaging: Arc::new(InMemoryTopicMessaging::new()),
        };

        tracing::info!(backend = ?config.backend, "Application state initialized");
        Ok(state)
    }
}

fn in_memory_collections() -> Collections {
    Collections {
        posts: Arc::new(InMemoryCollection::new(POSTS_COLLECTION)),
        comments: Arc::new(InMemoryCollections::new()),
        users: Arc::new(InMemoryCollection::new(USERS_COLLECTION)),
    }
}

async fn open_collections(config: &AppConfig) -> Collections {
    match config.backend {
        Backend::Memory => in_memory_collections(),
        Backend::Redis => open_redis_collections(config).await,
    }
}

#[cfg(feature = "redis")]
async fn open_redis_collections(config: &AppConfig) -> Collections {
    use pulse_infra::{RedisBackend, RedisConfig};

    let redis_config = RedisConfig {
        url: config.redis_url.clone(),
        connect_timeout: config.redis_connect_timeout,
    };

    match RedisBackend::new(&redis_config).await {
        Ok(backend) => Collections {
            posts: Arc::new(backend.open::<Post>(POSTS_COLLECTION)),
            users: Arc::new(backend.open::<User>(USERS_COLLECTION)),
            comments: Arc::new(backend),
        },
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to connect to Redis. Using in-memory fallback."
            );
            in_memory_collections()
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn open_redis_collections(_config: &AppConfig) -> Collections {
    tracing::warn!("Running without redis feature - using in-memory collections");
    in_memory_collections()
}

#[cfg(feature = "http")]
fn network_monitor(config: &AppConfig) -> anyhow::Result<Arc<dyn NetworkMonitor>> {
    use pulse_infra::{HttpProbeConfig, HttpProbeMonitor};

    Ok(match &config.network_probe_url {
        Some(url) => Arc::new(HttpProbeMonitor::new(HttpProbeConfig {
            url: url.clone(),
            timeout: config.network_probe_timeout,
        })?),
        None => Arc::new(StaticNetworkMonitor::new(true)),
    })
}

#[cfg(not(feature = "http"))]
fn network_monitor(config: &AppConfig) -> anyhow::Result<Arc<dyn NetworkMonitor>> {
    if config.network_probe_url.is_some() {
        tracing::warn!("NETWORK_PROBE_URL ignored without http feature");
    }
    Ok(Arc::new(StaticNetworkMonitor::new(true)))
}

#[cfg(feature = "http")]
fn blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    use pulse_infra::{HttpBlobConfig, HttpBlobStore};

    Ok(match &config.blob_base_url {
        Some(url) => Arc::new(HttpBlobStore::new(HttpBlobConfig::new(url.clone()))?),
        None => Arc::new(InMemoryBlobStore::new()),
    })
}

#[cfg(not(feature = "http"))]
fn blob_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    if config.blob_base_url.is_some() {
        tracing::warn!("BLOB_BASE_URL ignored without http feature");
    }
    Ok(Arc::new(InMemoryBlobStore::new()))
}
