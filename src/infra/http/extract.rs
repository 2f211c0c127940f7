//! Identity extractors.
//!
//! Token verification is owned by the upstream gateway; by the time a
//! request reaches this service the authenticated user id rides in the
//! `x-user-id` header. `Actor` demands it, `Viewer` merely picks it up.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user performing a mutation. Missing or malformed
/// identity rejects the request.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub Uuid);

/// Optional identity on read paths; selects the per-viewer projection.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

fn header_user_id(parts: &Parts) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let text = value
        .to_str()
        .map_err(|_| ApiError::bad_request("invalid user id header", None))?;
    let id = Uuid::parse_str(text).map_err(|err| {
        ApiError::bad_request("invalid user id header", Some(err.to_string()))
    })?;
    Ok(Some(id))
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match header_user_id(parts)? {
            Some(id) => Ok(Actor(id)),
            None => Err(ApiError::unauthorized()),
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(header_user_id(parts)?))
    }
}
