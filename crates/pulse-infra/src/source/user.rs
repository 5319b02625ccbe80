use std::sync::Arc;

use async_trait::async_trait;

use pulse_core::SourceError;
use pulse_core::domain::User;
use pulse_core::ports::{LiveQuery, UserStore};

use crate::store::Collection;

/// User mirror backed by a document collection.
pub struct DocumentUserStore {
    users: Arc<dyn Collection<User>>,
}

impl DocumentUserStore {
    pub fn new(users: Arc<dyn Collection<User>>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for DocumentUserStore {
    async fn exists(&self, id: &str) -> Result<bool, SourceError> {
        self.users.contains(id).await
    }

    async fn put(&self, user: User) -> Result<(), SourceError> {
        self.users.upsert(user).await
    }

    async fn delete(&self, id: &str) -> Result<(), SourceError> {
        self.users.remove(id).await
    }

    fn observe_user(&self, id: &str) -> LiveQuery<Option<User>> {
        self.users.watch_one(id)
    }
}
