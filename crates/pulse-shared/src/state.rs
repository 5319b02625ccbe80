//! Screen states.

use serde::{Deserialize, Serialize};

/// Why a screen has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorState {
    /// The source answered with no data.
    Empty,
    /// Connectivity failure, local or reported by the backend.
    Network,
    /// Any other failure with the underlying message verbatim.
    Generic(String),
}

/// State of a screen backed by a live query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Success(T),
    Error(ErrorState),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorState> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// State of a submit action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SaveState<T> {
    Idle,
    Saving,
    Saved(T),
    Failed(ErrorState),
}

impl<T> SaveState<T> {
    /// Whether no submission is in flight.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Saving)
    }
}

impl<T> Default for SaveState<T> {
    fn default() -> Self {
        Self::Idle
    }
}
