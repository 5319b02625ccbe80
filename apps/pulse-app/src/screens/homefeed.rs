use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use pulse_core::domain::{Direction, Post};
use pulse_core::ports::NetworkMonitor;
use pulse_core::repository::{PostRepository, UserRepository};
use pulse_shared::{Notice, ViewState};

use super::{LiveSlot, Notices, follow, observe, present_list};
use crate::state::AppState;

/// The feed of every post, newest first.
pub struct HomefeedScreen {
    posts: Arc<PostRepository>,
    network: Arc<dyn NetworkMonitor>,
    state: Arc<watch::Sender<ViewState<Vec<Post>>>>,
    signed_in: Arc<watch::Sender<bool>>,
    notices: Notices,
    feed: LiveSlot,
    session: LiveSlot,
}

impl HomefeedScreen {
    /// Open the screen and start its subscriptions. Must run inside a tokio runtime.
    pub fn open(app: &AppState) -> Self {
        let screen = Self {
            posts: app.posts.clone(),
            network: app.network.clone(),
            state: Arc::new(watch::channel(ViewState::Loading).0),
            signed_in: Arc::new(watch::channel(false).0),
            notices: Notices::new(),
            feed: LiveSlot::new(),
            session: LiveSlot::new(),
        };
        screen.subscribe();
        screen.follow_session(&app.users);
        screen
    }

    pub fn state(&self) -> watch::Receiver<ViewState<Vec<Post>>> {
        self.state.subscribe()
    }

    pub fn signed_in(&self) -> watch::Receiver<bool> {
        self.signed_in.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    /// Resubscribe to the feed, or notify when there is no network.
    pub async fn refresh(&self) {
        if !self.network.is_available().await {
            self.notices.emit(Notice::NoNetwork);
            return;
        }
        tracing::debug!("Refreshing feed");
        self.subscribe();
    }

    fn subscribe(&self) {
        observe(
            &self.feed,
            &self.state,
            self.posts.posts(Direction::Descending),
            present_list,
        );
    }

    fn follow_session(&self, users: &UserRepository) {
        follow(&self.session, &self.signed_in, users.signed_in());
    }
}
