pub mod comments;
pub mod engagement;
pub mod posts;
pub mod users;

use axum::Json;

use super::models::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
