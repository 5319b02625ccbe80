//! Redis document collections with live queries.
//!
//! Layout per collection `<name>`:
//! - `pulse:<name>:docs`    hash, id -> JSON document
//! - `pulse:<name>:order`   sorted set, id scored by creation millis
//! - `pulse:<name>:changed` pub/sub channel, one message per write
//!
//! A live query subscribes to the change channel first, then refetches the
//! full result on every notification.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::mpsc;

use pulse_core::SourceError;
use pulse_core::domain::Direction;
use pulse_core::ports::LiveQuery;

use super::{Collection, CollectionProvider, Document};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Connected Redis backend, opens collections sharing one connection manager.
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    client: Client,
}

impl RedisBackend {
    pub async fn new(config: &RedisConfig) -> Result<Self, SourceError> {
        let client = Client::open(config.url.as_str()).map_err(map_redis_error)?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(
            config.connect_timeout,
            ConnectionManager::new(client.clone()),
        )
        .await
        .map_err(|_| SourceError::Network("Redis connection timed out".to_string()))?
        .map_err(map_redis_error)?;

        tracing::info!(url = %config.url, "Connected to Redis document store");

        Ok(Self { conn, client })
    }

    pub fn open<T: Document>(&self, name: &str) -> RedisCollection<T> {
        RedisCollection {
            conn: self.conn.clone(),
            client: self.client.clone(),
            keys: Arc::new(Keys::new(name)),
            _doc: PhantomData,
        }
    }
}

impl<T: Document> CollectionProvider<T> for RedisBackend {
    fn collection(&self, name: &str) -> Arc<dyn Collection<T>> {
        Arc::new(self.open::<T>(name))
    }
}

struct Keys {
    docs: String,
    order: String,
    changed: String,
}

impl Keys {
    fn new(name: &str) -> Self {
        Self {
            docs: format!("pulse:{name}:docs"),
            order: format!("pulse:{name}:order"),
            changed: format!("pulse:{name}:changed"),
        }
    }
}

/// Redis-backed collection of `T`.
pub struct RedisCollection<T> {
    conn: ConnectionManager,
    client: Client,
    keys: Arc<Keys>,
    _doc: PhantomData<fn() -> T>,
}

impl<T: Document> RedisCollection<T> {
    /// Spawn a live query task and expose its results as a stream.
    fn live<R, F, Fut>(&self, fetch: F) -> LiveQuery<R>
    where
        R: Send + 'static,
        F: Fn(ConnectionManager) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, SourceError>> + Send,
    {
        let (tx, rx) = mpsc::channel(16);
        let client = self.client.clone();
        let conn = self.conn.clone();
        let channel = self.keys.changed.clone();

        tokio::spawn(async move {
            run_live_query(client, conn, channel, tx, fetch).await;
        });

        futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed()
    }
}

async fn run_live_query<R, F, Fut>(
    client: Client,
    conn: ConnectionManager,
    channel: String,
    tx: mpsc::Sender<Result<R, SourceError>>,
    fetch: F,
) where
    F: Fn(ConnectionManager) -> Fut,
    Fut: Future<Output = Result<R, SourceError>>,
{
    let mut pubsub = match client.get_async_pubsub().await {
        Ok(pubsub) => pubsub,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get pubsub connection");
            let _ = tx.send(Err(map_redis_error(e))).await;
            return;
        }
    };

    if let Err(e) = pubsub.subscribe(&channel).await {
        tracing::error!(channel = %channel, error = %e, "Failed to subscribe");
        let _ = tx.send(Err(map_redis_error(e))).await;
        return;
    }

    tracing::debug!(channel = %channel, "Live query started");

    let mut changes = pubsub.on_message();
    loop {
        let result = fetch(conn.clone()).await;
        let failed = result.is_err();
        if tx.send(result).await.is_err() || failed {
            break;
        }

        tokio::select! {
            _ = tx.closed() => break,
            change = changes.next() => {
                if change.is_none() {
                    let _ = tx
                        .send(Err(SourceError::Network("Live query connection closed".to_string())))
                        .await;
                    break;
                }
            }
        }
    }

    tracing::debug!(channel = %channel, "Live query stopped");
}

async fn fetch_all<T: Document>(
    mut conn: ConnectionManager,
    keys: Arc<Keys>,
    direction: Direction,
) -> Result<Vec<T>, SourceError> {
    let ids = match direction {
        Direction::Ascending => conn.zrange::<_, Vec<String>>(&keys.order, 0, -1).await,
        Direction::Descending => conn.zrevrange::<_, Vec<String>>(&keys.order, 0, -1).await,
    }
    .map_err(map_redis_error)?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let raw: Vec<Option<String>> = redis::cmd("HMGET")
        .arg(&keys.docs)
        .arg(&ids)
        .query_async(&mut conn)
        .await
        .map_err(map_redis_error)?;

    // Entries removed between the two reads are skipped.
    raw.into_iter()
        .flatten()
        .map(|json| serde_json::from_str(&json).map_err(SourceError::from))
        .collect()
}

async fn fetch_one<T: Document>(
    mut conn: ConnectionManager,
    keys: Arc<Keys>,
    id: String,
) -> Result<Option<T>, SourceError> {
    let raw = conn
        .hget::<_, _, Option<String>>(&keys.docs, &id)
        .await
        .map_err(map_redis_error)?;

    raw.map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(SourceError::from)
}

#[async_trait]
impl<T: Document> Collection<T> for RedisCollection<T> {
    fn watch_all(&self, direction: Direction) -> LiveQuery<Vec<T>> {
        let keys = self.keys.clone();
        self.live(move |conn| fetch_all::<T>(conn, keys.clone(), direction))
    }

    fn watch_one(&self, id: &str) -> LiveQuery<Option<T>> {
        let keys = self.keys.clone();
        let id = id.to_string();
        self.live(move |conn| fetch_one::<T>(conn, keys.clone(), id.clone()))
    }

    async fn upsert(&self, doc: T) -> Result<(), SourceError> {
        let json = serde_json::to_string(&doc)?;
        let mut conn = self.conn.clone();

        let _: () = redis::pipe()
            .atomic()
            .hset(&self.keys.docs, doc.id(), json)
            .ignore()
            .zadd(&self.keys.order, doc.id(), doc.sort_key())
            .ignore()
            .cmd("PUBLISH")
            .arg(&self.keys.changed)
            .arg(doc.id())
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        tracing::debug!(collection = %self.keys.docs, id = %doc.id(), "Document written");
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, SourceError> {
        let mut conn = self.conn.clone();
        conn.hexists::<_, _, bool>(&self.keys.docs, id)
            .await
            .map_err(map_redis_error)
    }

    async fn remove(&self, id: &str) -> Result<(), SourceError> {
        let mut conn = self.conn.clone();

        let _: () = redis::pipe()
            .atomic()
            .hdel(&self.keys.docs, id)
            .ignore()
            .zrem(&self.keys.order, id)
            .ignore()
            .cmd("PUBLISH")
            .arg(&self.keys.changed)
            .arg(id)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(())
    }
}

fn map_redis_error(e: RedisError) -> SourceError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
    {
        SourceError::Network(e.to_string())
    } else {
        SourceError::Remote(e.to_string())
    }
}
