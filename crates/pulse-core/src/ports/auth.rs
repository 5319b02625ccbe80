//! Authentication ports.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::User;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    pub exp: i64,
}

/// Session-based identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, if the session is still valid.
    async fn current_user(&self) -> Option<User>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Delete the signed-in identity and end the session.
    async fn delete_current(&self) -> Result<(), AuthError>;

    /// Live "is signed in" flag. Emits the current value first.
    fn observe_signed_in(&self) -> BoxStream<'static, bool>;
}

/// Token service trait for session tokens.
pub trait TokenService: Send + Sync {
    /// Generate a session token for a user.
    fn generate_token(&self, user_id: &str, email: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailInUse,

    #[error("No user signed in")]
    NotSignedIn,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Auth backend error: {0}")]
    Backend(String),
}
