//! Domain entities - the records the client reads and writes.

mod comment;
mod post;
mod settings;
mod user;

pub use comment::{Comment, CommentDraft};
pub use post::{Post, PostDraft};
pub use settings::NotificationSetting;
pub use user::User;

/// Sort direction for collection queries ordered by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}
