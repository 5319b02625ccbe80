//! In-memory document collections.
//!
//! This is the default backend when Redis is not configured, and the fake used
//! by tests. Works within a single process only; data is lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use pulse_core::SourceError;
use pulse_core::domain::Direction;
use pulse_core::ports::LiveQuery;

use super::{Collection, CollectionProvider, Document, sort_documents};
use crate::live::watch_query;

struct Contents<T> {
    docs: HashMap<String, T>,
    failure: Option<SourceError>,
}

/// In-memory collection publishing every change to its live queries.
pub struct InMemoryCollection<T> {
    name: String,
    contents: watch::Sender<Contents<T>>,
    writes: AtomicUsize,
}

impl<T: Document> InMemoryCollection<T> {
    pub fn new(name: impl Into<String>) -> Self {
        let (contents, _) = watch::channel(Contents {
            docs: HashMap::new(),
            failure: None,
        });
        Self {
            name: name.into(),
            contents,
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed documents without counting them as writes.
    pub fn with_documents(self, docs: impl IntoIterator<Item = T>) -> Self {
        self.contents.send_modify(|contents| {
            for doc in docs {
                contents.docs.insert(doc.id().to_string(), doc);
            }
        });
        self
    }

    /// Break the collection: every live query emits `err` and closes, writes fail.
    pub fn fail(&self, err: SourceError) {
        tracing::debug!(collection = %self.name, error = %err, "Collection failure injected");
        self.contents
            .send_modify(|contents| contents.failure = Some(err));
    }

    /// Undo [`fail`](Self::fail). Live queries that already closed stay closed.
    pub fn recover(&self) {
        self.contents.send_modify(|contents| contents.failure = None);
    }

    /// Number of successful upserts and removals.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.contents.borrow().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn failure(&self) -> Option<SourceError> {
        self.contents.borrow().failure.clone()
    }
}

#[async_trait]
impl<T: Document> Collection<T> for InMemoryCollection<T> {
    fn watch_all(&self, direction: Direction) -> LiveQuery<Vec<T>> {
        watch_query(self.contents.subscribe(), move |contents: &Contents<T>| {
            if let Some(err) = &contents.failure {
                return Err(err.clone());
            }
            let mut docs: Vec<T> = contents.docs.values().cloned().collect();
            sort_documents(&mut docs, direction);
            Ok(docs)
        })
    }

    fn watch_one(&self, id: &str) -> LiveQuery<Option<T>> {
        let id = id.to_string();
        watch_query(self.contents.subscribe(), move |contents: &Contents<T>| {
            match &contents.failure {
                Some(err) => Err(err.clone()),
                None => Ok(contents.docs.get(&id).cloned()),
            }
        })
    }

    async fn upsert(&self, doc: T) -> Result<(), SourceError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        let id = doc.id().to_string();
        self.contents.send_modify(|contents| {
            contents.docs.insert(id.clone(), doc);
        });
        self.writes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(collection = %self.name, id = %id, "Document written");
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, SourceError> {
        let contents = self.contents.borrow();
        match &contents.failure {
            Some(err) => Err(err.clone()),
            None => Ok(contents.docs.contains_key(id)),
        }
    }

    async fn remove(&self, id: &str) -> Result<(), SourceError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        let mut removed = false;
        self.contents.send_if_modified(|contents| {
            removed = contents.docs.remove(id).is_some();
            removed
        });
        if removed {
            self.writes.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(collection = %self.name, id = %id, "Document removed");
        }
        Ok(())
    }
}

/// Registry of named in-memory collections, created on first use.
pub struct InMemoryCollections<T> {
    collections: Mutex<HashMap<String, Arc<InMemoryCollection<T>>>>,
}

impl<T: Document> InMemoryCollections<T> {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the collection called `name`.
    pub fn get(&self, name: &str) -> Arc<InMemoryCollection<T>> {
        let mut collections = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemoryCollection::new(name)))
            .clone()
    }
}

impl<T: Document> Default for InMemoryCollections<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> CollectionProvider<T> for InMemoryCollections<T> {
    fn collection(&self, name: &str) -> Arc<dyn Collection<T>> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use futures::StreamExt;
    use pulse_core::domain::Post;

    use super::*;

    fn post(id: &str, secs: i64) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            description: Some("text".to_string()),
            photo_url: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            author: None,
        }
    }

    #[tokio::test]
    async fn test_watch_all_emits_full_ordered_lists() {
        let posts = InMemoryCollection::new("posts").with_documents([post("old", 10)]);
        let mut live = posts.watch_all(Direction::Descending);

        let first = live.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);

        posts.upsert(post("new", 20)).await.unwrap();
        let second = live.next().await.unwrap().unwrap();
        let ids: Vec<&str> = second.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(posts.writes(), 1);
    }

    #[tokio::test]
    async fn test_watch_one_emits_none_until_written() {
        let posts = InMemoryCollection::new("posts");
        let mut live = posts.watch_one("p1");

        assert_eq!(live.next().await.unwrap().unwrap(), None);
        posts.upsert(post("p1", 10)).await.unwrap();
        assert_eq!(live.next().await.unwrap().unwrap().unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_failure_closes_live_queries() {
        let posts = InMemoryCollection::new("posts").with_documents([post("p1", 10)]);
        let mut live = posts.watch_all(Direction::Ascending);
        live.next().await.unwrap().unwrap();

        posts.fail(SourceError::remote("permission denied"));

        assert_eq!(
            live.next().await,
            Some(Err(SourceError::remote("permission denied")))
        );
        assert!(live.next().await.is_none());
        assert!(posts.upsert(post("p2", 20)).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_missing_document_is_not_a_write() {
        let posts = InMemoryCollection::<Post>::new("posts");
        posts.remove("nope").await.unwrap();
        assert_eq!(posts.writes(), 0);
    }

    #[test]
    fn test_registry_reuses_collections() {
        let registry = InMemoryCollections::<Post>::new();
        let a = registry.get("posts:1:comments");
        let b = registry.get("posts:1:comments");
        assert!(Arc::ptr_eq(&a, &b));
    }
}
