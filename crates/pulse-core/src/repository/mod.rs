//! Repositories - thin services over the ports, shared by every screen.
//!
//! Repositories hold no mutable state of their own, so a single instance per
//! entity can be handed to any number of consumers behind an `Arc`.

mod comment;
mod post;
mod settings;
mod user;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;
