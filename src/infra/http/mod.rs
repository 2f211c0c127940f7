pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::infra::http::middleware::log_responses;

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/v1/posts",
            get(handlers::posts::list_posts).post(handlers::posts::create_post),
        )
        .route(
            "/api/v1/posts/{id}",
            get(handlers::posts::get_post)
                .patch(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route(
            "/api/v1/posts/{id}/like",
            post(handlers::engagement::like_post).delete(handlers::engagement::unlike_post),
        )
        .route(
            "/api/v1/posts/{id}/favorite",
            post(handlers::engagement::favorite_post)
                .delete(handlers::engagement::unfavorite_post),
        )
        .route(
            "/api/v1/posts/{id}/comments",
            get(handlers::comments::list_comments).post(handlers::comments::create_comment),
        )
        .route("/api/v1/users/{id}/posts", get(handlers::users::user_posts))
        .route("/api/v1/me/favorites", get(handlers::users::my_favorites))
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .with_state(state)
}
