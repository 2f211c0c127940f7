//! Post content rules shared by the create and update paths.

use crate::domain::error::DomainError;
use crate::domain::types::PostStatus;

pub const TITLE_MAX_CHARS: usize = 255;
pub const COMMENT_MAX_CHARS: usize = 10_000;

/// Author name substituted when the owning user row is missing. Referential
/// integrity should make this unreachable, but a missing author must not
/// fail a read.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Validated draft of a post body, produced before anything touches storage.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub status: PostStatus,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        status: PostStatus,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let body = body.into();

        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        if trimmed_title.chars().count() > TITLE_MAX_CHARS {
            return Err(DomainError::validation(format!(
                "title exceeds {TITLE_MAX_CHARS} characters"
            )));
        }
        if body.trim().is_empty() {
            return Err(DomainError::validation("body must not be empty"));
        }

        Ok(Self {
            title: trimmed_title.to_string(),
            body,
            status,
        })
    }
}

/// Validate a comment body before insertion.
pub fn validate_comment_body(body: &str) -> Result<(), DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::validation("comment must not be empty"));
    }
    if body.chars().count() > COMMENT_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "comment exceeds {COMMENT_MAX_CHARS} characters"
        )));
    }
    Ok(())
}
