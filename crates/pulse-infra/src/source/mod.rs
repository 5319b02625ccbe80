//! Entity sources over document collections.
//!
//! These are backend-agnostic: the same source runs over in-memory or Redis
//! collections, and owns the connectivity check that guards every write.

mod comment;
mod post;
mod user;

pub use comment::DocumentCommentSource;
pub use post::DocumentPostSource;
pub use user::DocumentUserStore;

/// Collection holding every post.
pub const POSTS_COLLECTION: &str = "posts";

/// Collection holding every mirrored user.
pub const USERS_COLLECTION: &str = "users";

/// Name of the comment collection of one post.
pub fn comments_collection(post_id: &str) -> String {
    format!("{POSTS_COLLECTION}:{post_id}:comments")
}
