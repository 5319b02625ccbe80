use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;
use crate::error::ValidationError;

/// Post entity - a titled entry in the feed with a description, a photo, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Local reference before upload, retrieval URL after.
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Denormalized copy of the author at write time.
    pub author: Option<User>,
}

impl Post {
    /// Check the content invariant: non-blank title and at least a description or a photo.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_post_fields(
            &self.title,
            self.description.as_deref(),
            self.photo_url.as_deref(),
        )
    }

    /// Whether the photo still points at a local file that needs uploading.
    pub fn has_local_photo(&self) -> bool {
        self.photo_url.as_deref().is_some_and(is_local_reference)
    }

    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

/// Returns true for `file://` URIs and bare paths.
pub fn is_local_reference(uri: &str) -> bool {
    match uri.split_once("://") {
        Some((scheme, _)) => scheme.eq_ignore_ascii_case("file"),
        None => true,
    }
}

fn validate_post_fields(
    title: &str,
    description: Option<&str>,
    photo_url: Option<&str>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    let has_description = description.is_some_and(|d| !d.trim().is_empty());
    if !has_description && photo_url.is_none() {
        return Err(ValidationError::MissingContent);
    }
    Ok(())
}

/// Editable form content for a post that has not been submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub photo_url: Option<String>,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_post_fields(
            &self.title,
            Some(self.description.as_str()),
            self.photo_url.as_deref(),
        )
    }

    /// Build the record to persist with a fresh id and the current time.
    pub fn into_post(self, author: Option<User>) -> Post {
        let description = (!self.description.trim().is_empty()).then_some(self.description);
        Post {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description,
            photo_url: self.photo_url,
            created_at: Utc::now(),
            author,
        }
    }
}
