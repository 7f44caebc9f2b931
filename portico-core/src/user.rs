//! User domain model.
//!
//! [`User`] is the persisted row including the password hash; it never
//! crosses the HTTP boundary. [`UserProfile`] is the sanitized snapshot that
//! is returned to clients and serialized into session records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum account handle length accepted at registration.
pub const MIN_ACCOUNT_LEN: usize = 4;
/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Account handles: letters, digits, and a small set of separators so email
/// style handles work.
static ACCOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@._-]+$").expect("account pattern is valid"));

/// Authorization role. Only two values exist; there is no hierarchy beyond
/// the admin/user distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// Persisted user record. `user_role` and `user_status` are stored as text;
/// parsing into [`Role`] happens when the row is sanitized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub user_account: String,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub user_password: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub user_status: String,
    pub user_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_delete: bool,
}

impl User {
    /// Strip the credential fields, producing the snapshot used for API
    /// responses and session records. Unrecognized role text degrades to the
    /// ordinary user role rather than minting privileges.
    pub fn sanitized(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            user_account: self.user_account.clone(),
            avatar_url: self.avatar_url.clone(),
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            user_status: self.user_status.clone(),
            user_role: Role::from_str(&self.user_role).unwrap_or(Role::User),
            created_at: self.created_at,
        }
    }
}

/// Sanitized identity snapshot. Immutable for the life of a session token:
/// profile edits made after login are not reflected until re-login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub user_account: String,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub user_status: String,
    pub user_role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("account, password and confirmation must not be blank")]
    MissingFields,
    #[error("account must be at least {MIN_ACCOUNT_LEN} characters")]
    AccountTooShort,
    #[error("account contains unsupported characters")]
    AccountInvalidChars,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("password and confirmation do not match")]
    PasswordMismatch,
}

pub fn validate_account(account: &str) -> Result<(), ValidationError> {
    if account.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if account.chars().count() < MIN_ACCOUNT_LEN {
        return Err(ValidationError::AccountTooShort);
    }
    if !ACCOUNT_PATTERN.is_match(account) {
        return Err(ValidationError::AccountInvalidChars);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_registration(
    account: &str,
    password: &str,
    check_password: &str,
) -> Result<(), ValidationError> {
    if account.trim().is_empty() || password.trim().is_empty() || check_password.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    validate_account(account)?;
    validate_password(password)?;
    if password != check_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
