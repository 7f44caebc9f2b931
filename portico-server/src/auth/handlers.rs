//! Registration, login, and logout.

use axum::{extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use portico_core::UserProfile;
use portico_core::api::ApiResponse;
use portico_core::session::issue_token;

use crate::auth::middleware::extract_token;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;
use crate::infra::extract::Json;
use crate::users::service::UserService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_account: String,
    pub user_password: String,
    pub check_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_account: String,
    pub user_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<i64>>> {
    let service = UserService::new(&state);
    let user_id = service
        .register(
            &request.user_account,
            &request.user_password,
            &request.check_password,
        )
        .await?;
    Ok(Json(ApiResponse::success(user_id)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let service = UserService::new(&state);
    let user = service
        .verify_credentials(&request.user_account, &request.user_password)
        .await?;

    // The snapshot stored here is what the gate sees for the life of the
    // token; later profile edits only surface after re-login.
    let profile = user.sanitized();
    let token = issue_token();
    state.sessions.store(&token, &profile).await?;

    info!(user_id = profile.id, "user logged in");
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: profile,
    })))
}

/// Logout is best-effort: a failed revocation is logged, never surfaced —
/// the client must not end up worse off for trying to log out.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<i32>>> {
    if let Some(token) = extract_token(&headers) {
        if let Err(err) = state.sessions.revoke(&token).await {
            warn!(error = %err, "failed to revoke session on logout");
        }
    }
    Ok(Json(ApiResponse::success(1)))
}
