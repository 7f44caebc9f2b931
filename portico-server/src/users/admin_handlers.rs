//! Administration endpoints. Every route here sits behind the access gate's
//! admin rule, so handlers can assume the caller holds the admin role.

use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use portico_core::UserProfile;
use portico_core::api::ApiResponse;
use portico_core::repository::{Page, UserQuery, UserUpdate};
use portico_core::user::Role;

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};
use crate::infra::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub username: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<ApiResponse<Page<UserProfile>>>> {
    let page = state
        .users
        .page(UserQuery {
            page: query.page.unwrap_or(1),
            page_size: query.page_size.unwrap_or(10),
            username: query.username.filter(|name| !name.trim().is_empty()),
        })
        .await?;
    Ok(Json(ApiResponse::success(
        page.map(|user| user.sanitized()),
    )))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    validate_id(id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    Ok(Json(ApiResponse::success(user.sanitized())))
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub user_status: Option<String>,
    pub user_role: Option<Role>,
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<ApiResponse<i32>>> {
    validate_id(id)?;
    let changes = UserUpdate {
        username: request.username,
        avatar_url: request.avatar_url,
        gender: request.gender,
        phone: request.phone,
        email: request.email,
        user_status: request.user_status,
        user_role: request.user_role,
    };

    let updated = state.users.update(id, changes).await?;
    if !updated {
        return Err(AppError::not_found("user not found"));
    }
    info!(user_id = id, "admin updated user");
    Ok(Json(ApiResponse::success(1)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<i32>>> {
    validate_id(id)?;
    let deleted = state.users.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found("user not found"));
    }
    info!(user_id = id, "admin deleted user");
    Ok(Json(ApiResponse::success(1)))
}

fn validate_id(id: i64) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::bad_request("user id must be positive"));
    }
    Ok(())
}
