//! Like and favorite handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::infra::http::error::ApiError;
use crate::infra::http::extract::Actor;
use crate::infra::http::models::MessageResponse;
use crate::infra::http::state::ApiState;

pub async fn like_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.engagement.like(actor, id).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("post liked"))))
}

pub async fn unlike_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.engagement.unlike(actor, id).await?;
    Ok(Json(MessageResponse::new("post unliked")))
}

pub async fn favorite_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.engagement.favorite(actor, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("post favorited")),
    ))
}

pub async fn unfavorite_post(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.engagement.unfavorite(actor, id).await?;
    Ok(Json(MessageResponse::new("post unfavorited")))
}
