//! Form intents forwarded by the presentation layer.

/// A change in one field of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    TitleChanged(String),
    DescriptionChanged(String),
    PhotoChanged(Option<String>),
    CommentChanged(String),
}
