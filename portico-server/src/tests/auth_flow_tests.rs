//! End-to-end account lifecycle: register, login, authenticated reads,
//! logout, and the validation / uniform-error rules around them.

use axum::http::StatusCode;
use serde_json::json;

use crate::tests::test_utils::*;

#[tokio::test]
async fn full_lifecycle_register_login_me_logout() {
    let ctx = setup();
    let token = register_and_login(&ctx, "pat@example.com", "password123").await;

    let response = send(&ctx, get("/api/v1/users/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["user_account"], "pat@example.com");
    assert_eq!(body["data"]["user_role"], "user");
    assert!(
        body["data"].get("user_password").is_none(),
        "password hash must never be serialized"
    );

    // A fresh registration is not an admin.
    let response = send(&ctx, get("/api/v1/admin/users", Some(&token))).await;
    let body = response_json(response).await;
    assert_eq!(body["code"], 40101);

    let response = send(&ctx, post_json("/api/v1/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.sessions.live_sessions(), 0);

    // The token is dead after logout.
    let response = send(&ctx, get("/api/v1/users/me", Some(&token))).await;
    let body = response_json(response).await;
    assert_eq!(body["code"], 40100);
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let ctx = setup();

    let cases = [
        json!({"user_account": "abc", "user_password": "password123", "check_password": "password123"}),
        json!({"user_account": "pat#bad", "user_password": "password123", "check_password": "password123"}),
        json!({"user_account": "valid-account", "user_password": "short", "check_password": "short"}),
        json!({"user_account": "valid-account", "user_password": "password123", "check_password": "password124"}),
        json!({"user_account": "  ", "user_password": "password123", "check_password": "password123"}),
    ];
    for case in cases {
        let response = send(&ctx, post_json("/api/v1/auth/register", None, case.clone())).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected rejection for {case}"
        );
        let body = response_json(response).await;
        assert_eq!(body["code"], 40000);
    }
}

#[tokio::test]
async fn malformed_json_bodies_get_the_error_envelope() {
    let ctx = setup();

    let response = send(
        &ctx,
        post_raw("/api/v1/auth/register", None, "{not valid json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // The rejection must wear the envelope, not axum's plain-text body.
    let body = response_json(response).await;
    assert_eq!(body["code"], 40000);
    assert_eq!(body["message"], "bad request");
}

#[tokio::test]
async fn register_rejects_duplicate_accounts() {
    let ctx = setup();
    register_and_login(&ctx, "taken-account", "password123").await;

    let response = send(
        &ctx,
        post_json(
            "/api/v1/auth/register",
            None,
            json!({
                "user_account": "taken-account",
                "user_password": "password456",
                "check_password": "password456",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], 40000);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let ctx = setup();
    seed_user(&ctx, "known-account", "password123", "user");

    let wrong_password = send(
        &ctx,
        post_json(
            "/api/v1/auth/login",
            None,
            json!({"user_account": "known-account", "user_password": "wrong-password"}),
        ),
    )
    .await;
    let unknown_account = send(
        &ctx,
        post_json(
            "/api/v1/auth/login",
            None,
            json!({"user_account": "no-such-account", "user_password": "password123"}),
        ),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_account.status(), StatusCode::BAD_REQUEST);
    let a = response_json(wrong_password).await;
    let b = response_json(unknown_account).await;
    // Same code and same description: the response must not reveal whether
    // the account exists.
    assert_eq!(a, b);
}

#[tokio::test]
async fn logout_without_a_session_still_succeeds() {
    let ctx = setup();
    seed_user(&ctx, "quiet-user", "password123", "user");
    let token = login(&ctx, "quiet-user", "password123").await;

    let first = send(&ctx, post_json("/api/v1/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Logging out again requires passing the gate, which the dead token
    // cannot do.
    let second = send(&ctx, post_json("/api/v1/auth/logout", Some(&token), json!({}))).await;
    let body = response_json(second).await;
    assert_eq!(body["code"], 40100);
}

#[tokio::test]
async fn profile_snapshot_is_stable_until_relogin() {
    let ctx = setup();
    let token = register_and_login(&ctx, "edit-me", "password123").await;

    let response = send(
        &ctx,
        patch_json(
            "/api/v1/users/me",
            Some(&token),
            json!({"username": "Fresh Name"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The session snapshot predates the edit, so /me still shows the old
    // profile until the user logs in again.
    let response = send(&ctx, get("/api/v1/users/me", Some(&token))).await;
    let body = response_json(response).await;
    assert_ne!(body["data"]["username"], "Fresh Name");

    let fresh_token = login(&ctx, "edit-me", "password123").await;
    let response = send(&ctx, get("/api/v1/users/me", Some(&fresh_token))).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["username"], "Fresh Name");
}

#[tokio::test]
async fn two_logins_hold_independent_sessions() {
    let ctx = setup();
    seed_user(&ctx, "twice-user", "password123", "user");

    let first = login(&ctx, "twice-user", "password123").await;
    let second = login(&ctx, "twice-user", "password123").await;
    assert_ne!(first, second);

    send(&ctx, post_json("/api/v1/auth/logout", Some(&first), json!({}))).await;

    // Revoking one token leaves the other alive.
    let response = send(&ctx, get("/api/v1/users/me", Some(&second))).await;
    let body = response_json(response).await;
    assert_eq!(body["code"], 0);
}
