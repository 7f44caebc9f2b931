//! The access gate: resolve the bearer token, enforce the path policy, and
//! publish the identity into the request scope — all before any handler runs.
//!
//! Registration, login, and meta endpoints are excluded structurally: they
//! live on routes this middleware is never layered over.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::current_user::CurrentUser;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppError;

pub async fn access_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::not_login("missing credentials"))?;

    let profile = match state.sessions.resolve(&token).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Err(AppError::not_login("session expired, please log in again"));
        }
        Err(err) => {
            // Fail closed: an unreachable store means we cannot vouch for
            // the session, not that the caller is trusted.
            warn!(error = %err, "session lookup failed, rejecting request");
            return Err(AppError::not_login("session could not be verified"));
        }
    };

    let path = request.uri().path().to_owned();
    if !state.policy.authorize(&path, profile.user_role) {
        warn!(user_id = profile.id, %path, "insufficient role for path");
        return Err(AppError::no_auth("administrator role required"));
    }

    request.extensions_mut().insert(CurrentUser::new(profile));
    Ok(next.run(request).await)
}

/// The `Authorization` header carries the raw session token, no scheme
/// prefix. Blank values count as missing.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
