//! Request and response DTOs for the JSON API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::feed::FeedQueryParams;
use crate::domain::types::PostStatus;

fn default_status() -> PostStatus {
    PostStatus::Published
}

#[derive(Debug, Deserialize)]
pub struct FeedListQuery {
    pub search: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl From<FeedListQuery> for FeedQueryParams {
    fn from(query: FeedListQuery) -> Self {
        Self {
            search: query.search,
            offset: query.offset,
            limit: query.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub body: String,
    #[serde(default = "default_status")]
    pub status: PostStatus,
}

#[derive(Debug, Deserialize)]
pub struct PostUpdateRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    pub body: String,
    pub parent_comment_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
