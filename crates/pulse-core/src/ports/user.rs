//! User mirror port - the document-store copy of auth identities.

use async_trait::async_trait;

use super::LiveQuery;
use crate::domain::User;
use crate::error::SourceError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists(&self, id: &str) -> Result<bool, SourceError>;

    /// Create or replace the user record.
    async fn put(&self, user: User) -> Result<(), SourceError>;

    async fn delete(&self, id: &str) -> Result<(), SourceError>;

    fn observe_user(&self, id: &str) -> LiveQuery<Option<User>>;
}
