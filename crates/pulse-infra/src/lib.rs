//! # Pulse Infrastructure
//!
//! Concrete implementations of the ports defined in `pulse-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `redis` - Redis document store with pub/sub live queries
//! - `auth` - Local accounts with Argon2 hashes and JWT sessions
//! - `http` - HTTP blob upload and connectivity probe

pub mod blob;
pub mod live;
pub mod messaging;
pub mod network;
pub mod settings;
pub mod source;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use blob::InMemoryBlobStore;
pub use messaging::InMemoryTopicMessaging;
pub use network::StaticNetworkMonitor;
pub use settings::{FileKeyValueStore, InMemoryKeyValueStore};
pub use source::{DocumentCommentSource, DocumentPostSource, DocumentUserStore};
pub use store::{Collection, CollectionProvider, InMemoryCollection, InMemoryCollections};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService, LocalAuthProvider};

// Re-exports - HTTP
#[cfg(feature = "http")]
pub use blob::{HttpBlobConfig, HttpBlobStore};
#[cfg(feature = "http")]
pub use network::{HttpProbeConfig, HttpProbeMonitor};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use store::{RedisBackend, RedisCollection, RedisConfig};
