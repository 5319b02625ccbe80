use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use pulse_core::domain::{Post, PostDraft};
use pulse_core::error::ValidationError;
use pulse_core::ports::NetworkMonitor;
use pulse_core::repository::{PostRepository, UserRepository};
use pulse_shared::{ErrorState, FormEvent, Notice, SaveState};

use super::{Notices, classify_domain};
use crate::state::AppState;

/// Post creation form.
///
/// Submitting validates locally, then checks connectivity, and only then
/// reaches the repository.
pub struct AddPostScreen {
    posts: Arc<PostRepository>,
    users: Arc<UserRepository>,
    network: Arc<dyn NetworkMonitor>,
    draft: watch::Sender<PostDraft>,
    field_error: watch::Sender<Option<ValidationError>>,
    save: watch::Sender<SaveState<Post>>,
    notices: Notices,
}

impl AddPostScreen {
    pub fn open(app: &AppState) -> Self {
        Self {
            posts: app.posts.clone(),
            users: app.users.clone(),
            network: app.network.clone(),
            draft: watch::channel(PostDraft::default()).0,
            field_error: watch::channel(None).0,
            save: watch::channel(SaveState::Idle).0,
            notices: Notices::new(),
        }
    }

    pub fn draft(&self) -> watch::Receiver<PostDraft> {
        self.draft.subscribe()
    }

    pub fn field_error(&self) -> watch::Receiver<Option<ValidationError>> {
        self.field_error.subscribe()
    }

    pub fn save_state(&self) -> watch::Receiver<SaveState<Post>> {
        self.save.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    pub fn is_valid(&self) -> bool {
        self.draft.borrow().validate().is_ok()
    }

    pub fn on_action(&self, event: FormEvent) {
        self.draft.send_modify(|draft| match event {
            FormEvent::TitleChanged(title) => draft.title = title,
            FormEvent::DescriptionChanged(description) => draft.description = description,
            FormEvent::PhotoChanged(photo) => draft.photo_url = photo,
            FormEvent::CommentChanged(_) => {
                tracing::debug!("Ignoring comment change on the post form");
            }
        });
        self.field_error.send_replace(None);
    }

    /// Move to `Saving` unless a submission is already in flight.
    fn claim(&self) -> bool {
        self.save.send_if_modified(|state| {
            if state.is_settled() {
                *state = SaveState::Saving;
                true
            } else {
                false
            }
        })
    }

    /// Submit the draft. The outcome lands in [`save_state`](Self::save_state).
    pub async fn save(&self) {
        let draft = self.draft.borrow().clone();
        if let Err(invalid) = draft.validate() {
            self.field_error.send_replace(Some(invalid));
            self.notices.emit(Notice::Invalid(invalid));
            return;
        }

        if !self.claim() {
            tracing::debug!("Post submission already in flight");
            return;
        }

        if !self.network.is_available().await {
            self.notices.emit(Notice::NoNetwork);
            self.save.send_replace(SaveState::Failed(ErrorState::Network));
            return;
        }

        let author = self.users.current_user().await;
        let outcome = match self.posts.add_post(draft.into_post(author)).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, "Post created");
                SaveState::Saved(post)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Post creation failed");
                SaveState::Failed(classify_domain(&e))
            }
        };
        self.save.send_replace(outcome);
    }
}
