//! Per-request identity scope.
//!
//! The access gate stores the resolved identity in the request's extensions:
//! one instance per in-flight request, written once by the gate, read by
//! handlers through the extractor below. Extensions are owned by the request
//! itself, so the identity is dropped on every exit path — success, handler
//! error, or a panic unwinding through the middleware stack — and can never
//! leak into an unrelated request.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use portico_core::{Role, UserProfile};

use crate::infra::errors::AppError;

#[derive(Debug, Clone)]
pub struct CurrentUser(Arc<UserProfile>);

impl CurrentUser {
    pub(crate) fn new(profile: UserProfile) -> Self {
        Self(Arc::new(profile))
    }

    pub fn profile(&self) -> &UserProfile {
        &self.0
    }

    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.user_role
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::not_login("authentication required"))
    }
}
