//! Post handlers: the cached feed read path plus author mutations.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::posts::PostChanges;
use crate::infra::http::error::ApiError;
use crate::infra::http::extract::{Actor, Viewer};
use crate::infra::http::models::{FeedListQuery, PostCreateRequest, PostUpdateRequest};
use crate::infra::http::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    Viewer(viewer): Viewer,
    Query(query): Query<FeedListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.feed.list_feed(query.into(), viewer).await?;
    Ok(Json(entries))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Viewer(viewer): Viewer,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.feed.post_detail(id, viewer).await?;
    Ok(Json(entry))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .create_post(actor, payload.title, payload.body, payload.status)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changes = PostChanges {
        title: payload.title,
        body: payload.body,
        status: payload.status,
    };
    let post = state.posts.update_post(actor, id, changes).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.posts.delete_post(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
