//! Comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::infra::http::error::ApiError;
use crate::infra::http::extract::Actor;
use crate::infra::http::models::CommentCreateRequest;
use crate::infra::http::state::ApiState;

pub async fn list_comments(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.engagement.comments_for(id).await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state
        .engagement
        .comment(actor, id, payload.body, payload.parent_comment_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
