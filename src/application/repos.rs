//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, CommentView, FeedEntry, PostRecord, UserRecord};
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Normalized read query for feed-shaped listings. Produced by the feed
/// service after clamping, never built directly from raw HTTP input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub body: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Assemble one page of the public feed: published posts only, filtered
    /// by the optional search text, ordered newest first (ties broken by id
    /// ascending), with counts and viewer flags computed in the same read.
    async fn list_feed(
        &self,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError>;

    /// Assemble the feed projection of a single post, any status.
    async fn feed_entry(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<FeedEntry>, RepoError>;

    /// Published posts by one author, newest first.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait EngagementRepo: Send + Sync {
    /// Insert a like edge. The store's uniqueness constraint is the source
    /// of truth for duplicates and surfaces as `RepoError::Duplicate`.
    async fn insert_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;

    /// Remove a like edge. Returns false when no edge existed.
    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    async fn insert_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;

    async fn delete_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// The viewer's favorited published posts, most recently favorited first.
    async fn list_favorites(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<FeedEntry>, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn create_comment(&self, params: CreateCommentParams)
    -> Result<CommentRecord, RepoError>;

    /// All comments on a post, newest first, with author names resolved.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
}
