use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, CommentView, FeedEntry, PostRecord, UserRecord};
use crate::domain::types::PostStatus;

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) status: PostStatus,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: Option<OffsetDateTime>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            body: row.body,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FeedEntryRow {
    pub(crate) id: Uuid,
    pub(crate) author_id: Uuid,
    pub(crate) author_name: String,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) status: PostStatus,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: Option<OffsetDateTime>,
    pub(crate) like_count: i64,
    pub(crate) comment_count: i64,
    pub(crate) is_liked: bool,
    pub(crate) is_favorited: bool,
}

impl From<FeedEntryRow> for FeedEntry {
    fn from(row: FeedEntryRow) -> Self {
        Self {
            id: row.id,
            author_id: row.author_id,
            author_name: row.author_name,
            title: row.title,
            body: row.body,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            like_count: row.like_count,
            comment_count: row.comment_count,
            is_liked: row.is_liked,
            is_favorited: row.is_favorited,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub(crate) id: Uuid,
    pub(crate) post_id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) parent_comment_id: Option<Uuid>,
    pub(crate) body: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            parent_comment_id: row.parent_comment_id,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CommentViewRow {
    pub(crate) id: Uuid,
    pub(crate) post_id: Uuid,
    pub(crate) author_id: Uuid,
    pub(crate) author_name: String,
    pub(crate) parent_comment_id: Option<Uuid>,
    pub(crate) body: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<CommentViewRow> for CommentView {
    fn from(row: CommentViewRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            author_name: row.author_name,
            parent_comment_id: row.parent_comment_id,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) bio: Option<String>,
    pub(crate) avatar_url: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: Option<OffsetDateTime>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            bio: row.bio,
            avatar_url: row.avatar_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
