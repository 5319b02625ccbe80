//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Substrings that mark a backend failure message as connectivity related.
const NETWORK_MARKERS: &[&str] = &["network", "internet"];

/// Local validation failures - raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    BlankTitle,

    #[error("A description or a photo is required")]
    MissingContent,

    #[error("Comment is required")]
    BlankComment,
}

/// Data source errors - failures reported by an adapter or its backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The local connectivity check failed, the backend was never contacted.
    #[error("No internet connection")]
    Offline,

    #[error("{0}")]
    Network(String),

    /// Any other backend failure, message kept verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("User not signed in")]
    NotSignedIn,

    #[error("Malformed document: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Whether the failure should surface as a connectivity problem.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Offline | Self::Network(_) => true,
            Self::Remote(message) => {
                let message = message.to_lowercase();
                NETWORK_MARKERS.iter().any(|m| message.contains(m))
            }
            Self::NotSignedIn | Self::Decode(_) => false,
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Image upload failed")]
    ImageUpload,

    #[error("User not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl DomainError {
    /// The underlying source error, if the failure came from an adapter.
    pub fn as_source(&self) -> Option<&SourceError> {
        match self {
            Self::Source(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        assert!(SourceError::Offline.is_network());
        assert!(SourceError::Network("connection reset".into()).is_network());
        assert!(SourceError::remote("network unreachable").is_network());
        assert!(SourceError::remote("Failed: NETWORK error").is_network());
        assert!(!SourceError::remote("permission denied").is_network());
        assert!(!SourceError::Decode("bad json".into()).is_network());
    }

    #[test]
    fn test_remote_message_is_verbatim() {
        assert_eq!(
            SourceError::remote("permission denied").to_string(),
            "permission denied"
        );
    }
}
