//! One-shot notifications, delivered once and never replayed.

use pulse_core::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    #[error("No network connection")]
    NoNetwork,

    #[error("{0}")]
    Invalid(ValidationError),

    #[error("{0}")]
    Failure(String),
}
