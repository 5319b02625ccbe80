//! # Pulse Shared
//!
//! The contract between the view-state reducers and whatever renders them.
//! Every type here is a closed sum type so renderers can match exhaustively.

pub mod form;
pub mod notice;
pub mod state;

pub use form::FormEvent;
pub use notice::Notice;
pub use state::{ErrorState, SaveState, ViewState};
