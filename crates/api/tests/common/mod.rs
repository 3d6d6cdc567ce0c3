#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use critiq_api::app::build_app;
use critiq_api::auth::jwt::{generate_access_token, JwtConfig};
use critiq_api::config::ServerConfig;
use critiq_api::state::AppState;
use critiq_db::models::user::CreateUser;
use critiq_db::repositories::UserRepo;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The production router and middleware stack over the test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(AppState::new(pool, test_config())).unwrap()
}

// ---------------------------------------------------------------------------
// Identity helpers
// ---------------------------------------------------------------------------

/// Insert a user with the given role and return `(user_id, bearer_token)`.
pub async fn user_with_token(pool: &PgPool, username: &str, role: &str) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: Some(role.to_string()),
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, role, &test_config().jwt).unwrap();
    (user.id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(json), Some(token)).await
}

pub async fn post_json_anonymous(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(json), None).await
}

pub async fn patch_json(app: Router, uri: &str, json: serde_json::Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(json), Some(token)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Create a title through the API as `admin_token`, returning its id.
pub async fn create_title(pool: &PgPool, admin_token: &str, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({"name": name, "year": 1972}),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a review through the API, returning the raw response.
pub async fn post_review(
    pool: &PgPool,
    title_id: i64,
    token: &str,
    text: &str,
    score: i64,
) -> Response {
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/titles/{title_id}/reviews"),
        serde_json::json!({"text": text, "score": score}),
        token,
    )
    .await
}
