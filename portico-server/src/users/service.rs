//! Account registration and credential verification.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, warn};

use portico_core::repository::NewUser;
use portico_core::user::{User, validate_registration};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Creates an account and returns its id. The repository's unique
    /// constraint is the final arbiter on duplicate accounts, so there is
    /// no check-then-insert race to worry about.
    pub async fn register(
        &self,
        user_account: &str,
        user_password: &str,
        check_password: &str,
    ) -> AppResult<i64> {
        validate_registration(user_account, user_password, check_password)?;

        let password_hash = hash_password(user_password)?;
        let user_id = self
            .state
            .users
            .insert(NewUser {
                user_account: user_account.to_owned(),
                password_hash,
            })
            .await?;

        info!(user_id, "registered new account");
        Ok(user_id)
    }

    /// Looks up the account and checks the password. Unknown accounts and
    /// wrong passwords produce the same error, so callers cannot probe
    /// which accounts exist.
    pub async fn verify_credentials(
        &self,
        user_account: &str,
        user_password: &str,
    ) -> AppResult<User> {
        let user = match self.state.users.find_by_account(user_account).await? {
            Some(user) => user,
            None => {
                warn!(user_account, "login attempt for unknown account");
                return Err(login_failed());
            }
        };

        if !verify_password(user_password, &user.user_password) {
            warn!(user_id = user.id, "login attempt with wrong password");
            return Err(login_failed());
        }

        Ok(user)
    }
}

fn login_failed() -> AppError {
    AppError::bad_request("account or password incorrect")
}

pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("stored password hash is not parseable");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
