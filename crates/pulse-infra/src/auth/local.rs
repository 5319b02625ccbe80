//! Auth provider keeping accounts in process memory.
//!
//! Passwords are stored as Argon2 hashes; the session is a JWT that is
//! re-validated on every `current_user` call, so an expired token signs the
//! user out.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use pulse_core::domain::User;
use pulse_core::ports::{AuthError, AuthProvider, PasswordService, TokenService};

use crate::live::watch_stream;

struct Account {
    user: User,
    password_hash: String,
}

#[derive(Clone)]
struct Session {
    user: User,
    token: String,
}

pub struct LocalAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: watch::Sender<Option<Session>>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl LocalAuthProvider {
    pub fn new(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session,
            tokens,
            passwords,
        }
    }

    fn start_session(&self, user: &User, email: &str) -> Result<(), AuthError> {
        let token = self.tokens.generate_token(&user.id, email)?;
        self.session.send_replace(Some(Session {
            user: user.clone(),
            token,
        }));
        Ok(())
    }

    fn end_session(&self) -> Option<Session> {
        self.session.send_replace(None)
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn current_user(&self) -> Option<User> {
        let session = self.session.borrow().clone()?;

        match self.tokens.validate_token(&session.token) {
            Ok(claims) if claims.user_id == session.user.id => Some(session.user),
            Ok(_) => {
                tracing::warn!(user_id = %session.user.id, "Session token belongs to another user");
                self.end_session();
                None
            }
            Err(e) => {
                tracing::info!(user_id = %session.user.id, error = %e, "Session ended");
                self.end_session();
                None
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&account_key(email))
                .ok_or(AuthError::InvalidCredentials)?;

            if !self.passwords.verify(password, &account.password_hash)? {
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };

        self.start_session(&user, email)?;
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError> {
        let key = account_key(email);
        let user = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse);
            }

            let password_hash = self.passwords.hash(password)?;
            let mut user = User::new(Uuid::new_v4().to_string()).with_email(email.trim());
            user.display_name = display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);

            accounts.insert(
                key,
                Account {
                    user: user.clone(),
                    password_hash,
                },
            );
            user
        };

        self.start_session(&user, email)?;
        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.end_session() {
            tracing::info!(user_id = %session.user.id, "Signed out");
        }
        Ok(())
    }

    async fn delete_current(&self) -> Result<(), AuthError> {
        let session = self.session.borrow().clone().ok_or(AuthError::NotSignedIn)?;

        self.accounts
            .write()
            .await
            .retain(|_, account| account.user.id != session.user.id);
        self.end_session();
        Ok(())
    }

    fn observe_signed_in(&self) -> BoxStream<'static, bool> {
        watch_stream(self.session.subscribe(), |session: &Option<Session>| {
            session.is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

    fn provider(expiration_hours: i64) -> LocalAuthProvider {
        let tokens = JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours,
            issuer: "pulse-test".to_string(),
        });
        LocalAuthProvider::new(Arc::new(tokens), Arc::new(Argon2PasswordService::new()))
    }

    #[tokio::test]
    async fn test_sign_up_starts_session() {
        let auth = provider(1);

        let user = auth
            .sign_up("gerry@example.com", "password1", Some("Gerry"))
            .await
            .unwrap();

        assert_eq!(user.display_name.as_deref(), Some("Gerry"));
        assert_eq!(auth.current_user().await, Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let auth = provider(1);
        auth.sign_up("gerry@example.com", "password1", None)
            .await
            .unwrap();

        let err = auth
            .sign_up("Gerry@Example.com", "password2", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let auth = provider(1);
        auth.sign_up("gerry@example.com", "password1", None)
            .await
            .unwrap();
        auth.sign_out().await.unwrap();

        assert!(matches!(
            auth.sign_in("gerry@example.com", "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(auth.sign_in("gerry@example.com", "password1").await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_session_signs_out() {
        let auth = provider(-1);
        auth.sign_up("gerry@example.com", "password1", None)
            .await
            .unwrap();

        assert_eq!(auth.current_user().await, None);

        let mut signed_in = auth.observe_signed_in();
        assert_eq!(signed_in.next().await, Some(false));
    }

    #[tokio::test]
    async fn test_delete_removes_account() {
        let auth = provider(1);
        auth.sign_up("gerry@example.com", "password1", None)
            .await
            .unwrap();

        auth.delete_current().await.unwrap();

        assert_eq!(auth.current_user().await, None);
        assert!(matches!(
            auth.sign_in("gerry@example.com", "password1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.delete_current().await,
            Err(AuthError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_signed_in_flag_follows_session() {
        let auth = provider(1);
        let mut signed_in = auth.observe_signed_in();
        assert_eq!(signed_in.next().await, Some(false));

        auth.sign_up("gerry@example.com", "password1", None)
            .await
            .unwrap();
        assert_eq!(signed_in.next().await, Some(true));

        auth.sign_out().await.unwrap();
        assert_eq!(signed_in.next().await, Some(false));
    }
}
