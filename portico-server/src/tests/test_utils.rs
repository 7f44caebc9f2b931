//! Shared helpers for router-level tests.
//!
//! Tests run the real router with the in-memory adapters, so the access gate,
//! extractors, and handlers are exercised exactly as in production, minus
//! Postgres and Redis.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;

use portico_core::repository::MemoryUserRepository;
use portico_core::session::MemorySessionStore;
use portico_core::user::User;

use crate::infra::app_state::AppState;
use crate::infra::config::Config;
use crate::routes::create_app;
use crate::users::service::hash_password;

pub struct TestContext {
    pub app: Router,
    pub users: Arc<MemoryUserRepository>,
    pub sessions: Arc<MemorySessionStore>,
}

pub fn setup() -> TestContext {
    let users = Arc::new(MemoryUserRepository::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let state = AppState::new(
        Arc::new(Config::default()),
        users.clone(),
        sessions.clone(),
    );
    TestContext {
        app: create_app(state),
        users,
        sessions,
    }
}

/// Seed a user directly into the repository, bypassing the register
/// endpoint, and return its id.
pub fn seed_user(ctx: &TestContext, account: &str, password: &str, role: &str) -> i64 {
    let hash = hash_password(password).expect("hashing must succeed");
    ctx.users.seed(User {
        id: 0,
        username: Some(format!("{account} display")),
        user_account: account.to_string(),
        avatar_url: None,
        gender: None,
        user_password: hash,
        phone: None,
        email: None,
        user_status: "active".to_string(),
        user_role: role.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_delete: false,
    })
}

pub fn get(path: &str, token: Option<&str>) -> Request<Body> {
    build_request("GET", path, token, None)
}

pub fn delete(path: &str, token: Option<&str>) -> Request<Body> {
    build_request("DELETE", path, token, None)
}

pub fn post_json(path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    build_request("POST", path, token, Some(body))
}

pub fn patch_json(path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    build_request("PATCH", path, token, Some(body))
}

/// POST a raw body under a JSON content type, for malformed-input tests.
pub fn post_raw(path: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request must build")
}

fn build_request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    request.expect("request must build")
}

pub async fn send(ctx: &TestContext, request: Request<Body>) -> Response<Body> {
    ctx.app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

/// Register and log in through the HTTP surface, returning the token.
pub async fn register_and_login(ctx: &TestContext, account: &str, password: &str) -> String {
    let response = send(
        ctx,
        post_json(
            "/api/v1/auth/register",
            None,
            json!({
                "user_account": account,
                "user_password": password,
                "check_password": password,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    login(ctx, account, password).await
}

/// Log in through the HTTP surface, returning the token.
pub async fn login(ctx: &TestContext, account: &str, password: &str) -> String {
    let response = send(
        ctx,
        post_json(
            "/api/v1/auth/login",
            None,
            json!({
                "user_account": account,
                "user_password": password,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["code"], 0);
    body["data"]["token"]
        .as_str()
        .expect("login must return a token")
        .to_string()
}
