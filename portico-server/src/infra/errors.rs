//! HTTP error type.
//!
//! Every rejection carries the stable `{code, message, description}` triplet.
//! Clients distinguish `40100` (re-login) from `40101` (missing permission),
//! so those codes must never be conflated with generic bad-request errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use portico_core::CoreError;
use portico_core::api::ApiResponse;
use portico_core::session::SessionStoreError;
use portico_core::user::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

pub const CODE_BAD_REQUEST: u32 = 40000;
pub const CODE_NOT_LOGIN: u32 = 40100;
pub const CODE_NO_AUTH: u32 = 40101;
pub const CODE_NOT_FOUND: u32 = 40400;
pub const CODE_SYSTEM_ERROR: u32 = 50000;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: u32,
    pub message: &'static str,
    pub description: String,
}

impl AppError {
    fn new(
        status: StatusCode,
        code: u32,
        message: &'static str,
        description: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            description: description.into(),
        }
    }

    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            CODE_BAD_REQUEST,
            "bad request",
            description,
        )
    }

    pub fn not_login(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            CODE_NOT_LOGIN,
            "not logged in",
            description,
        )
    }

    pub fn no_auth(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            CODE_NO_AUTH,
            "forbidden",
            description,
        )
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            CODE_NOT_FOUND,
            "not found",
            description,
        )
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_SYSTEM_ERROR,
            "internal error",
            description,
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.description)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(
            self.code,
            self.message,
            self.description,
        ));
        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Conflict(msg) => Self::bad_request(msg),
            CoreError::NotFound(msg) => Self::not_found(msg),
            CoreError::Database(err) => {
                tracing::error!(error = %err, "database error");
                Self::internal("database error")
            }
            CoreError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<SessionStoreError> for AppError {
    fn from(err: SessionStoreError) -> Self {
        tracing::error!(error = %err, "session store error");
        Self::internal("session store unavailable")
    }
}
