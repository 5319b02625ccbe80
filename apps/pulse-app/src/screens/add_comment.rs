use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use pulse_core::domain::{Comment, CommentDraft};
use pulse_core::error::ValidationError;
use pulse_core::ports::NetworkMonitor;
use pulse_core::repository::{CommentRepository, UserRepository};
use pulse_shared::{ErrorState, FormEvent, Notice, SaveState};

use super::{Notices, classify_domain};
use crate::state::AppState;

/// Comment form attached to one post.
pub struct AddCommentScreen {
    post_id: String,
    comments: Arc<CommentRepository>,
    users: Arc<UserRepository>,
    network: Arc<dyn NetworkMonitor>,
    draft: watch::Sender<CommentDraft>,
    field_error: watch::Sender<Option<ValidationError>>,
    save: watch::Sender<SaveState<Comment>>,
    notices: Notices,
}

impl AddCommentScreen {
    pub fn open(app: &AppState, post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            comments: app.comments.clone(),
            users: app.users.clone(),
            network: app.network.clone(),
            draft: watch::channel(CommentDraft::default()).0,
            field_error: watch::channel(None).0,
            save: watch::channel(SaveState::Idle).0,
            notices: Notices::new(),
        }
    }

    pub fn draft(&self) -> watch::Receiver<CommentDraft> {
        self.draft.subscribe()
    }

    pub fn field_error(&self) -> watch::Receiver<Option<ValidationError>> {
        self.field_error.subscribe()
    }

    pub fn save_state(&self) -> watch::Receiver<SaveState<Comment>> {
        self.save.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    pub fn is_valid(&self) -> bool {
        self.draft.borrow().validate().is_ok()
    }

    pub fn on_action(&self, event: FormEvent) {
        match event {
            FormEvent::CommentChanged(content) => {
                self.draft.send_modify(|draft| draft.content = content);
                self.field_error.send_replace(None);
            }
            other => tracing::debug!(event = ?other, "Ignoring post field on the comment form"),
        }
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

    pub async fn save(&self) {
        let draft = self.draft.borrow().clone();
        if let Err(invalid) = draft.validate() {
            self.field_error.send_replace(Some(invalid));
            self.notices.emit(Notice::Invalid(invalid));
            return;
        }

        if !self.claim() {
            tracing::debug!("Comment submission already in flight");
            return;
        }

        if !self.network.is_available().await {
            self.notices.emit(Notice::NoNetwork);
            self.save.send_replace(SaveState::Failed(ErrorState::Network));
            return;
        }

        let author = self.users.current_user().await;
        let comment = draft.into_comment(self.post_id.as_str(), author);
        let outcome = match self.comments.add_comment(&self.post_id, comment).await {
            Ok(comment) => SaveState::Saved(comment),
            Err(e) => {
                tracing::warn!(post_id = %self.post_id, error = %e, "Comment creation failed");
                SaveState::Failed(classify_domain(&e))
            }
        };
        self.save.send_replace(outcome);
    }
}

#[cfg(test)]
mod tests {
    use pulse_core::SourceError;

    use super::*;
    use crate::screens::testing::{Fixture, post};

    #[tokio::test]
    async fn test_online_comment_is_written_once() {
        let fixture = Fixture::with_posts([post("p1", 10)]);
        let screen = AddCommentScreen::open(&fixture.app, "p1");

        screen.on_action(FormEvent::CommentChanged("hi".to_string()));
        screen.save().await;

        let calls = fixture.comment_source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "p1");
        assert_eq!(calls[0].1.content, "hi");
        assert!(matches!(
            &*screen.save_state().borrow(),
            SaveState::Saved(comment) if comment.content == "hi" && comment.post_id == "p1"
        ));
        assert_eq!(fixture.comment_collection("p1").len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_saves_write_once() {
        let fixture = Fixture::with_posts([post("p1", 10)]);
        let screen = AddCommentScreen::open(&fixture.app_with_yielding_network(), "p1");
        screen.on_action(FormEvent::CommentChanged("hi".to_string()));

        tokio::join!(screen.save(), screen.save());

        assert_eq!(fixture.comment_source.calls().len(), 1);
        assert_eq!(fixture.comment_collection("p1").len(), 1);
    }

    #[tokio::test]
    async fn test_blank_comment_is_rejected_locally() {
        let fixture = Fixture::new();
        let screen = AddCommentScreen::open(&fixture.app, "p1");
        let mut notices = screen.notices().unwrap();

        screen.on_action(FormEvent::CommentChanged("  \n ".to_string()));
        assert!(!screen.is_valid());
        screen.save().await;

        assert_eq!(
            notices.recv().await,
            Some(Notice::Invalid(ValidationError::BlankComment))
        );
        assert!(fixture.comment_source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_offline_comment_makes_no_adapter_calls() {
        let fixture = Fixture::new();
        let screen = AddCommentScreen::open(&fixture.app, "p1");
        let mut notices = screen.notices().unwrap();
        screen.on_action(FormEvent::CommentChanged("hi".to_string()));

        fixture.network.set_available(false);
        screen.save().await;

        assert_eq!(notices.recv().await, Some(Notice::NoNetwork));
        assert_eq!(
            *screen.save_state().borrow(),
            SaveState::Failed(ErrorState::Network)
        );
        assert!(fixture.comment_source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_network_rejection_is_network_failure() {
        let fixture = Fixture::new();
        fixture
            .comment_collection("p1")
            .fail(SourceError::remote("A network error occurred"));
        let screen = AddCommentScreen::open(&fixture.app, "p1");
        screen.on_action(FormEvent::CommentChanged("hi".to_string()));

        screen.save().await;

        assert_eq!(
            *screen.save_state().borrow(),
            SaveState::Failed(ErrorState::Network)
        );
    }

    #[tokio::test]
    async fn test_post_fields_are_ignored() {
        let fixture = Fixture::new();
        let screen = AddCommentScreen::open(&fixture.app, "p1");

        screen.on_action(FormEvent::TitleChanged("title".to_string()));

        assert_eq!(screen.draft().borrow().content, "");
    }
}
