//! View-state reducers.
//!
//! Every screen turns repository streams into [`ViewState`]s published on
//! `watch` channels, and reports one-shot events as [`Notice`]s. Screens own
//! their subscription tasks through [`LiveSlot`]s: dropping a screen stops
//! everything it started.

mod add_comment;
mod add_post;
mod detail;
mod homefeed;
mod profile;
mod settings;
mod slot;

#[cfg(test)]
pub(crate) mod testing;

pub use add_comment::AddCommentScreen;
pub use add_post::AddPostScreen;
pub use detail::DetailScreen;
pub use homefeed::HomefeedScreen;
pub use profile::ProfileScreen;
pub use settings::SettingsScreen;
pub use slot::{Lease, LiveSlot};

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{mpsc, watch};

use pulse_core::ports::LiveQuery;
use pulse_core::{DomainError, SourceError};
use pulse_shared::{ErrorState, Notice, ViewState};

/// Map a source failure to what the screen shows.
pub fn classify(err: &SourceError) -> ErrorState {
    if err.is_network() {
        ErrorState::Network
    } else {
        ErrorState::Generic(err.to_string())
    }
}

/// Map a failed write to what the screen shows.
pub fn classify_domain(err: &DomainError) -> ErrorState {
    match err {
        DomainError::Source(source) => classify(source),
        other => ErrorState::Generic(other.to_string()),
    }
}

/// A collection result: empty means "nothing to show", never an empty success.
pub fn present_list<T>(items: Vec<T>) -> ViewState<Vec<T>> {
    if items.is_empty() {
        ViewState::Error(ErrorState::Empty)
    } else {
        ViewState::Success(items)
    }
}

/// An id-keyed result: a missing record is empty.
pub fn present_one<T>(item: Option<T>) -> ViewState<T> {
    match item {
        Some(item) => ViewState::Success(item),
        None => ViewState::Error(ErrorState::Empty),
    }
}

/// Enter `Loading`, then classify every emission of `query` into `state`.
///
/// The subscription ends on the first error; there is no retry.
pub(crate) fn observe<S, T>(
    slot: &LiveSlot,
    state: &Arc<watch::Sender<ViewState<T>>>,
    query: LiveQuery<S>,
    present: fn(S) -> ViewState<T>,
) where
    S: Send + 'static,
    T: Send + Sync + 'static,
{
    let state = state.clone();
    slot.start(move |lease| {
        lease.publish(&state, ViewState::Loading);
        drive(query, state, lease, present)
    });
}

async fn drive<S, T>(
    mut query: LiveQuery<S>,
    state: Arc<watch::Sender<ViewState<T>>>,
    lease: Lease,
    present: fn(S) -> ViewState<T>,
) {
    while let Some(result) = query.next().await {
        match result {
            Ok(data) => {
                if !lease.publish(&state, present(data)) {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Live query failed");
                lease.publish(&state, ViewState::Error(classify(&e)));
                return;
            }
        }
    }
    tracing::debug!("Live query completed");
}

/// Mirror a plain stream into `state` for as long as the slot keeps it.
pub(crate) fn follow<T>(
    slot: &LiveSlot,
    state: &Arc<watch::Sender<T>>,
    mut stream: BoxStream<'static, T>,
) where
    T: Send + Sync + 'static,
{
    let state = state.clone();
    slot.start(move |lease| async move {
        while let Some(value) = stream.next().await {
            if !lease.publish(&state, value) {
                return;
            }
        }
    });
}

/// Notices kept for a listener that has not caught up yet.
pub const NOTICE_CAPACITY: usize = 16;

/// One-shot notices of a screen. Each notice is delivered once.
///
/// At most [`NOTICE_CAPACITY`] notices wait for the listener; newer ones are
/// dropped until it drains the queue.
pub struct Notices {
    tx: mpsc::Sender<Notice>,
    rx: Mutex<Option<mpsc::Receiver<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(NOTICE_CAPACITY);
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    pub fn emit(&self, notice: Notice) {
        tracing::debug!(notice = %notice, "Notice emitted");
        match self.tx.try_send(notice) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(notice)) => {
                tracing::warn!(notice = %notice, "Notice queue full, dropping notice");
            }
            // Receiver taken and dropped, nobody is listening.
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    /// Take the receiving end. Only the first caller gets it.
    pub fn take(&self) -> Option<mpsc::Receiver<Notice>> {
        self.rx.lock().unwrap_or_else(|p| p.into_inner()).take()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}
