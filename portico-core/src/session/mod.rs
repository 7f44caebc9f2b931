//! Opaque session tokens and their backing store.
//!
//! A token is an unguessable random identifier with no embedded claims; the
//! identity snapshot lives server-side under a TTL. Every successful lookup
//! slides the TTL back to the full window, so active sessions never expire
//! while idle ones lapse after [`SESSION_TTL`].

mod memory;
mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::user::UserProfile;

/// Namespace prefix for session keys in the external store.
pub const TOKEN_PREFIX: &str = "USER_TOKEN:";

/// Fixed session lifetime: two hours of inactivity.
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Generate a fresh session token. Uniqueness rests on the CSPRNG behind
/// UUIDv4; the token is issued only, persisting it is a separate call.
pub fn issue_token() -> String {
    format!("{TOKEN_PREFIX}{}", Uuid::new_v4().simple())
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// The external store was unreachable or refused the operation.
    #[error("session store unavailable: {0}")]
    Backend(#[from] redis::RedisError),

    /// The identity snapshot could not be serialized.
    #[error("session record could not be encoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// TTL-bounded mapping from session token to identity snapshot.
///
/// Correctness across concurrent requests relies on the backing store's
/// atomic single-key operations; no in-process locking is layered on top.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the snapshot under `token` with the full TTL. A failure here
    /// must propagate: a login whose token was never stored has not
    /// succeeded.
    async fn store(&self, token: &str, profile: &UserProfile) -> Result<(), SessionStoreError>;

    /// Look up a token. A hit slides the TTL back to the full window and
    /// returns the snapshot. A miss — unknown token, expired key, or a
    /// payload that no longer deserializes — is `Ok(None)`, not an error.
    async fn resolve(&self, token: &str) -> Result<Option<UserProfile>, SessionStoreError>;

    /// Delete the token unconditionally. Revoking an absent token is fine;
    /// callers treat failures as best-effort.
    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_are_prefixed_and_unique() {
        let first = issue_token();
        let second = issue_token();
        assert!(first.starts_with(TOKEN_PREFIX));
        assert_eq!(first.len(), TOKEN_PREFIX.len() + 32);
        assert_ne!(first, second);
    }
}
