//! User-scoped listings.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::infra::http::error::ApiError;
use crate::infra::http::extract::{Actor, Viewer};
use crate::infra::http::models::FeedListQuery;
use crate::infra::http::state::ApiState;

pub async fn user_posts(
    State(state): State<ApiState>,
    Viewer(viewer): Viewer,
    Path(id): Path<Uuid>,
    Query(query): Query<FeedListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.feed.author_posts(id, query.into(), viewer).await?;
    Ok(Json(entries))
}

pub async fn my_favorites(
    State(state): State<ApiState>,
    Actor(actor): Actor,
    Query(query): Query<FeedListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.engagement.favorites_for(actor, query.into()).await?;
    Ok(Json(entries))
}
