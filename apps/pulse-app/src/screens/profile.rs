use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{mpsc, watch};

use pulse_core::DomainError;
use pulse_core::domain::User;
use pulse_core::repository::UserRepository;
use pulse_shared::Notice;

use super::{LiveSlot, Notices};
use crate::state::AppState;

/// Account management: session, mirror record and account deletion.
///
/// Every failure is reported as a [`Notice::Failure`] carrying its message.
pub struct ProfileScreen {
    users: Arc<UserRepository>,
    user: Arc<watch::Sender<Option<User>>>,
    signed_in: Arc<watch::Sender<bool>>,
    notices: Notices,
    session: LiveSlot,
}

impl ProfileScreen {
    pub fn open(app: &AppState) -> Self {
        let screen = Self {
            users: app.users.clone(),
            user: Arc::new(watch::channel(None).0),
            signed_in: Arc::new(watch::channel(false).0),
            notices: Notices::new(),
            session: LiveSlot::new(),
        };
        screen.follow_session();
        screen
    }

    pub fn user(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    pub fn signed_in(&self) -> watch::Receiver<bool> {
        self.signed_in.subscribe()
    }

    pub fn notices(&self) -> Option<mpsc::Receiver<Notice>> {
        self.notices.take()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> bool {
        let result = self.users.sign_in(email, password).await;
        self.report("sign in", result)
    }

    pub async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>) -> bool {
        let result = self.users.sign_up(email, password, display_name).await;
        self.report("sign up", result)
    }

    /// Create the mirrored user record if it does not exist yet.
    pub async fn sync_user(&self) -> bool {
        let result = self.users.ensure_mirrored().await;
        self.report("user sync", result)
    }

    pub async fn sign_out(&self) -> bool {
        let result = self.users.sign_out().await;
        self.report("sign out", result)
    }

    pub async fn delete_account(&self) -> bool {
        let result = self.users.delete_account().await;
        self.report("account deletion", result)
    }

    fn report<T>(&self, action: &str, result: Result<T, DomainError>) -> bool {
        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(action, error = %e, "Profile action failed");
                self.notices.emit(Notice::Failure(e.to_string()));
                false
            }
        }
    }

    fn follow_session(&self) {
        let users = self.users.clone();
        let user = self.user.clone();
        let signed_in = self.signed_in.clone();

        self.session.start(move |lease| async move {
            let mut flags = users.signed_in();
            while let Some(flag) = flags.next().await {
                let current = if flag { users.current_user().await } else { None };
                if !lease.publish(&user, current) || !lease.publish(&signed_in, flag) {
                    return;
                }
            }
        });
    }
}
