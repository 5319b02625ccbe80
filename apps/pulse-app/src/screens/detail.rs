use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use pulse_core::domain::{Comment, Post};
use pulse_core::ports::NetworkMonitor;
use pulse_core::repository::{CommentRepository, PostRepository};
use pulse_shared::{Notice, ViewState};

use super::{LiveSlot, Notices, follow, observe, present_list, present_one};
use crate::state::AppState;

/// One post with its comments, oldest comment first.
pub struct DetailScreen {
    post_id: String,
    posts: Arc<PostRepository>,
    comments: Arc<CommentRepository>,
    network: Arc<dyn NetworkMonitor>,
    post: Arc<watch::Sender<ViewState<Post>>>,
    thread: Arc<watch::Sender<ViewState<Vec<Comment>>>>,
    signed_in: Arc<watch::Sender<bool>>,
    notices: Notices,
    post_slot: LiveSlot,
    thread_slot: LiveSlot,
    session_slot: LiveSlot,
}

impl DetailScreen {
    pub fn open(app: &AppState, post_id: impl Into<String>) -> Self {
        let screen = Self {
            post_id: post_id.into(),
            posts: app.posts.clone(),
            comments: app.comments.clone(),
            network: app.network.clone(),
            post: Arc::new(watch::channel(ViewState::Loading).0),
            thread: Arc::new(watch::channel(ViewState::Loading).0),
            signed_in: Arc::new(watch::channel(false).0),
            notices: Notices::new(),
            post_slot: LiveSlot::new(),
            thread_slot: LiveSlot::new(),
            session_slot: LiveSlot::new(),
        };
        screen.subscribe();
        follow(&screen.session_slot, &screen.signed_in, app.users.signed_in());
        screen
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn post(&self) -> watch::Receiver<ViewState<Post>> {
        self.post.subscribe()
    }

    pub fn comments(&self) -> watch::Receiver<ViewState<Vec<Comment>>> {
        self.thread.subscribe()
    }

    pub fn signed_in(&self) -> watch::Receiver<bool> {
        self.signed_in.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    /// Resubscribe to both the post and its comments.
    pub async fn refresh(&self) {
        if !self.network.is_available().await {
            self.notices.emit(Notice::NoNetwork);
            return;
        }
        tracing::debug!(post_id = %self.post_id, "Refreshing post detail");
        self.subscribe();
    }

    fn subscribe(&self) {
        observe(
            &self.post_slot,
            &self.post,
            self.posts.post(&self.post_id),
            present_one,
        );
        observe(
            &self.thread_slot,
            &self.thread,
            self.comments.comments(&self.post_id),
            present_list,
        );
    }
}
