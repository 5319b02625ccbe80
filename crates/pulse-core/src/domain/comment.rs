use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;
use crate::error::ValidationError;

/// Comment entity - attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<User>,
}

impl Comment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_content(&self.content)
    }
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        Err(ValidationError::BlankComment)
    } else {
        Ok(())
    }
}

/// Editable form content for a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
}

impl CommentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_content(&self.content)
    }

    pub fn into_comment(self, post_id: impl Into<String>, author: Option<User>) -> Comment {
        Comment {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.into(),
            content: self.content,
            created_at: Utc::now(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_validity_is_blankness() {
        let blank = CommentDraft {
            content: " \n".to_string(),
        };
        assert_eq!(blank.validate(), Err(ValidationError::BlankComment));

        let ok = CommentDraft {
            content: "hi".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_into_comment_sets_parent() {
        let comment = CommentDraft {
            content: "hi".to_string(),
        }
        .into_comment("post-1", None);
        assert_eq!(comment.post_id, "post-1");
        assert_eq!(comment.content, "hi");
    }
}
