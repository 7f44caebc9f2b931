//! Self-service profile endpoints.

use axum::extract::State;
use serde::Deserialize;

use portico_core::UserProfile;
use portico_core::api::ApiResponse;
use portico_core::repository::UserUpdate;

use crate::auth::CurrentUser;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::Json;

/// Returns the profile snapshot captured at login. Edits made after login
/// show up here only once the user logs in again.
pub async fn get_current_user(
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    Ok(Json(ApiResponse::success(current_user.profile().clone())))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub async fn update_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<i32>>> {
    let changes = UserUpdate {
        username: non_blank(request.username),
        avatar_url: non_blank(request.avatar_url),
        gender: non_blank(request.gender),
        phone: non_blank(request.phone),
        email: non_blank(request.email),
        ..UserUpdate::default()
    };

    let updated = state.users.update(current_user.id(), changes).await?;
    if !updated {
        return Err(AppError::not_found("user not found"));
    }
    Ok(Json(ApiResponse::success(1)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
