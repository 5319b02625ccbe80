//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob;
mod comment;
mod key_value;
mod messaging;
mod network;
mod post;
mod user;

use futures::stream::BoxStream;

use crate::error::SourceError;

pub use auth::{AuthError, AuthProvider, PasswordService, SessionClaims, TokenService};
pub use blob::BlobStore;
pub use comment::CommentSource;
pub use key_value::{KeyValueStore, SettingsError};
pub use messaging::{MessagingError, TopicMessaging};
pub use network::NetworkMonitor;
pub use post::PostSource;
pub use user::UserStore;

/// A live query: emits the full result on every backend change, ends after an error.
pub type LiveQuery<T> = BoxStream<'static, Result<T, SourceError>>;
