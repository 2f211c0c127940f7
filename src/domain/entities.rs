//! Domain entities mirrored from persistent storage, plus the derived
//! projections that only ever live in the cache or in responses.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::PostStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub body: String,
    pub created_at: OffsetDateTime,
}

/// A post as seen by feed readers: the row joined with its author's display
/// name, engagement counts taken at assembly time, and the viewer's own
/// like/favorite flags when a viewer is known.
///
/// Never persisted to Postgres. Lives only in the cache and in responses,
/// and is rebuilt from scratch on every cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
    pub is_favorited: bool,
}

/// A comment joined with its author's display name. Not cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub parent_comment_id: Option<Uuid>,
    pub body: String,
    pub created_at: OffsetDateTime,
}
