//! HTTP surface tests: routing, identity extraction, status codes, and the
//! JSON error envelope, driven through the real router over the fakes.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use time::macros::datetime;
use tower::ServiceExt;
use uuid::Uuid;

use common::{Harness, harness};
use mostinger::domain::types::PostStatus;
use mostinger::infra::http::{self, ApiState};

fn router(h: &Harness) -> Router {
    http::build_router(ApiState {
        feed: h.feed.clone(),
        posts: h.posts.clone(),
        engagement: h.engagement.clone(),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn post_as(path: &str, actor: Uuid, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("x-user-id", actor.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_endpoint_responds() {
    let h = harness();
    let response = router(&h).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn feed_listing_returns_entries_with_counts() {
    let h = harness();
    let author = h.store.add_user("ada");
    h.store.add_post(
        author,
        "Hello",
        "world",
        PostStatus::Published,
        datetime!(2026-01-01 10:00 UTC),
    );

    let response = router(&h).oneshot(get("/api/v1/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Hello");
    assert_eq!(entries[0]["author_name"], "ada");
    assert_eq!(entries[0]["like_count"], 0);
    assert_eq!(entries[0]["is_liked"], false);
}

#[tokio::test]
async fn mutations_without_identity_are_unauthorized() {
    let h = harness();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"T","body":"B"}"#))
        .unwrap();

    let response = router(&h).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn malformed_identity_header_is_rejected() {
    let h = harness();
    let request = Request::builder()
        .uri("/api/v1/posts")
        .header("x-user-id", "not-a-uuid")
        .body(Body::empty())
        .unwrap();

    let response = router(&h).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_then_read_round_trip() {
    let h = harness();
    let author = h.store.add_user("ada");

    let payload = serde_json::json!({"title": "Hello", "body": "world"});
    let response = router(&h)
        .oneshot(post_as("/api/v1/posts", author, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "published");

    let response = router(&h)
        .oneshot(get(&format!("/api/v1/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["title"], "Hello");
}

#[tokio::test]
async fn duplicate_like_maps_to_conflict() {
    let h = harness();
    let author = h.store.add_user("ada");
    let reader = h.store.add_user("grace");
    let post_id = h.store.add_post(
        author,
        "Hello",
        "world",
        PostStatus::Published,
        datetime!(2026-01-01 10:00 UTC),
    );

    let path = format!("/api/v1/posts/{post_id}/like");
    let empty = serde_json::json!(null);

    let first = router(&h)
        .oneshot(post_as(&path, reader, &empty))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router(&h)
        .oneshot(post_as(&path, reader, &empty))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["error"]["code"], "duplicate");
}

#[tokio::test]
async fn liking_a_missing_post_is_not_found() {
    let h = harness();
    let reader = h.store.add_user("grace");
    let path = format!("/api/v1/posts/{}/like", Uuid::new_v4());

    let response = router(&h)
        .oneshot(post_as(&path, reader, &serde_json::json!(null)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn store_outage_is_a_server_error_with_opaque_envelope() {
    let h = harness();
    h.store.set_fail_reads(true);

    let response = router(&h).oneshot(get("/api/v1/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "store_unavailable");
    // Store internals stay out of the response body.
    assert!(body["error"].get("hint").is_none());
}

#[tokio::test]
async fn validation_failure_is_bad_request() {
    let h = harness();
    let author = h.store.add_user("ada");

    let payload = serde_json::json!({"title": "   ", "body": "world"});
    let response = router(&h)
        .oneshot(post_as("/api/v1/posts", author, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn favorites_require_identity_and_round_trip() {
    let h = harness();
    let author = h.store.add_user("ada");
    let reader = h.store.add_user("grace");
    let post_id = h.store.add_post(
        author,
        "Hello",
        "world",
        PostStatus::Published,
        datetime!(2026-01-01 10:00 UTC),
    );

    let anonymous = router(&h).oneshot(get("/api/v1/me/favorites")).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let path = format!("/api/v1/posts/{post_id}/favorite");
    router(&h)
        .oneshot(post_as(&path, reader, &serde_json::json!(null)))
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/api/v1/me/favorites")
        .header("x-user-id", reader.to_string())
        .body(Body::empty())
        .unwrap();
    let response = router(&h).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_favorited"], true);
}
