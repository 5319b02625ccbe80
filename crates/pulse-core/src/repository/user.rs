use std::sync::Arc;

use futures::stream::BoxStream;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{AuthProvider, LiveQuery, UserStore};

/// User repository - session identity plus its document-store mirror.
pub struct UserRepository {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn UserStore>,
}

impl UserRepository {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn UserStore>) -> Self {
        Self { auth, store }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.auth.current_user().await
    }

    pub fn signed_in(&self) -> BoxStream<'static, bool> {
        self.auth.observe_signed_in()
    }

    pub fn user(&self, id: &str) -> LiveQuery<Option<User>> {
        self.store.observe_user(id)
    }

    /// Sign in and mirror the user. A failed mirror ends the new session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self.auth.sign_in(email, password).await?;
        self.mirror_or_sign_out(user).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, DomainError> {
        let user = self.auth.sign_up(email, password, display_name).await?;
        self.mirror_or_sign_out(user).await
    }

    /// Create the mirrored record of the signed-in user if it is missing.
    pub async fn ensure_mirrored(&self) -> Result<(), DomainError> {
        let user = self
            .auth
            .current_user()
            .await
            .ok_or(DomainError::NotSignedIn)?;
        self.mirror(&user).await
    }

    pub async fn sign_out(&self) -> Result<(), DomainError> {
        self.auth.sign_out().await?;
        Ok(())
    }

    /// Remove the mirrored record, then the auth identity.
    pub async fn delete_account(&self) -> Result<(), DomainError> {
        let user = self
            .auth
            .current_user()
            .await
            .ok_or(DomainError::NotSignedIn)?;

        self.store.delete(&user.id).await?;
        self.auth.delete_current().await?;
        tracing::info!(user_id = %user.id, "Account deleted");
        Ok(())
    }

    async fn mirror_or_sign_out(&self, user: User) -> Result<User, DomainError> {
        if let Err(e) = self.mirror(&user).await {
            tracing::warn!(user_id = %user.id, error = %e, "User mirror failed, ending session");
            if let Err(sign_out) = self.auth.sign_out().await {
                tracing::error!(user_id = %user.id, error = %sign_out, "Sign-out after mirror failure failed");
            }
            return Err(e);
        }
        Ok(user)
    }

    async fn mirror(&self, user: &User) -> Result<(), DomainError> {
        if self.store.exists(&user.id).await? {
            tracing::debug!(user_id = %user.id, "User record already exists");
        } else {
            self.store.put(user.clone()).await?;
            tracing::debug!(user_id = %user.id, "User record created");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;
    use crate::error::SourceError;
    use crate::ports::AuthError;

    struct FixedAuth {
        user: Mutex<Option<User>>,
    }

    #[async_trait]
    impl AuthProvider for FixedAuth {
        async fn current_user(&self) -> Option<User> {
            self.user.lock().unwrap().clone()
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
            self.user
                .lock()
                .unwrap()
                .clone()
                .ok_or(AuthError::InvalidCredentials)
        }

        async fn sign_up(
            &self,
            email: &str,
            _password: &str,
            display_name: Option<&str>,
        ) -> Result<User, AuthError> {
            let mut user = User::new("new-user").with_email(email);
            user.display_name = display_name.map(str::to_string);
            *self.user.lock().unwrap() = Some(user.clone());
            Ok(user)
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            *self.user.lock().unwrap() = None;
            Ok(())
        }

        async fn delete_current(&self) -> Result<(), AuthError> {
            self.user
                .lock()
                .unwrap()
                .take()
                .map(|_| ())
                .ok_or(AuthError::NotSignedIn)
        }

        fn observe_signed_in(&self) -> BoxStream<'static, bool> {
            let signed_in = self.user.lock().unwrap().is_some();
            futures::stream::iter(vec![signed_in]).boxed()
        }
    }

    #[derive(Default)]
    struct MapStore {
        users: Mutex<HashMap<String, User>>,
        puts: Mutex<usize>,
        rejecting: Mutex<bool>,
    }

    #[async_trait]
    impl UserStore for MapStore {
        async fn exists(&self, id: &str) -> Result<bool, SourceError> {
            Ok(self.users.lock().unwrap().contains_key(id))
        }

        async fn put(&self, user: User) -> Result<(), SourceError> {
            if *self.rejecting.lock().unwrap() {
                return Err(SourceError::remote("permission denied"));
            }
            *self.puts.lock().unwrap() += 1;
            self.users.lock().unwrap().insert(user.id.clone(), user);
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<(), SourceError> {
            self.users.lock().unwrap().remove(id);
            Ok(())
        }

        fn observe_user(&self, id: &str) -> LiveQuery<Option<User>> {
            let user = self.users.lock().unwrap().get(id).cloned();
            futures::stream::iter(vec![Ok(user)]).boxed()
        }
    }

    fn repo(user: Option<User>) -> (UserRepository, Arc<MapStore>) {
        let store = Arc::new(MapStore::default());
        let auth = Arc::new(FixedAuth {
            user: Mutex::new(user),
        });
        (UserRepository::new(auth, store.clone()), store)
    }

    #[tokio::test]
    async fn test_ensure_mirrored_is_idempotent() {
        let (repo, store) = repo(Some(User::new("1").with_display_name("Gerry")));

        repo.ensure_mirrored().await.unwrap();
        repo.ensure_mirrored().await.unwrap();

        assert_eq!(*store.puts.lock().unwrap(), 1);
        assert!(store.users.lock().unwrap().contains_key("1"));
    }

    #[tokio::test]
    async fn test_ensure_mirrored_requires_session() {
        let (repo, _) = repo(None);
        assert!(matches!(
            repo.ensure_mirrored().await,
            Err(DomainError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_mirrors_user() {
        let (repo, store) = repo(None);

        let user = repo
            .sign_up("wally@example.com", "secret", Some("Wally"))
            .await
            .unwrap();

        assert_eq!(user.display_name.as_deref(), Some("Wally"));
        assert!(store.users.lock().unwrap().contains_key(&user.id));
    }

    #[tokio::test]
    async fn test_delete_account_removes_both_records() {
        let (repo, store) = repo(Some(User::new("1")));
        repo.ensure_mirrored().await.unwrap();

        repo.delete_account().await.unwrap();

        assert!(store.users.lock().unwrap().is_empty());
        assert!(repo.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_mirror_ends_session() {
        let (repo, store) = repo(None);
        *store.rejecting.lock().unwrap() = true;

        let result = repo.sign_up("wally@example.com", "secret", None).await;

        assert!(matches!(result, Err(DomainError::Source(_))));
        assert!(repo.current_user().await.is_none());
        assert!(store.users.lock().unwrap().is_empty());
    }
}
