use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::warn;

use super::{SESSION_TTL, SessionStore, SessionStoreError};
use crate::user::UserProfile;

/// In-memory [`SessionStore`] for tests and single-process experimentation.
///
/// Keeps the same observable semantics as the Redis adapter — JSON payloads,
/// sliding expiry, idempotent revocation. Deadlines are tracked against
/// `tokio::time::Instant` so paused-clock tests can step across the TTL
/// window deterministically.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    payload: String,
    expires_at: Instant,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) sessions, for test assertions.
    pub fn live_sessions(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .lock()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn store(&self, token: &str, profile: &UserProfile) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_string(profile)?;
        self.sessions.lock().insert(
            token.to_string(),
            Entry {
                payload,
                expires_at: Instant::now() + SESSION_TTL,
            },
        );
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<Option<UserProfile>, SessionStoreError> {
        let mut sessions = self.sessions.lock();
        let now = Instant::now();

        let Some(entry) = sessions.get_mut(token) else {
            return Ok(None);
        };
        if entry.expires_at <= now {
            sessions.remove(token);
            return Ok(None);
        }

        match serde_json::from_str::<UserProfile>(&entry.payload) {
            Ok(profile) => {
                entry.expires_at = now + SESSION_TTL;
                Ok(Some(profile))
            }
            Err(err) => {
                warn!(error = %err, "discarding undeserializable session record");
                sessions.remove(token);
                Ok(None)
            }
        }
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        self.sessions.lock().remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::session::issue_token;
    use crate::user::Role;

    fn profile(id: i64, role: Role) -> UserProfile {
        UserProfile {
            id,
            username: Some(format!("user-{id}")),
            user_account: format!("account-{id}"),
            avatar_url: None,
            gender: None,
            phone: None,
            email: None,
            user_status: "active".to_string(),
            user_role: role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn store_then_resolve_round_trips_the_profile() {
        let store = MemorySessionStore::new();
        let token = issue_token();
        let original = profile(1, Role::User);

        store.store(&token, &original).await.unwrap();
        let resolved = store.resolve(&token).await.unwrap().unwrap();
        assert_eq!(resolved, original);
    }

    #[tokio::test]
    async fn unknown_and_revoked_tokens_resolve_to_absent() {
        let store = MemorySessionStore::new();
        assert!(store.resolve("USER_TOKEN:never-issued").await.unwrap().is_none());

        let token = issue_token();
        store.store(&token, &profile(1, Role::User)).await.unwrap();
        store.revoke(&token).await.unwrap();
        assert!(store.resolve(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let store = MemorySessionStore::new();
        let token = issue_token();
        store.store(&token, &profile(1, Role::User)).await.unwrap();

        store.revoke(&token).await.unwrap();
        store.revoke(&token).await.unwrap();
        store.revoke("USER_TOKEN:never-issued").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn active_sessions_never_expire() {
        let store = MemorySessionStore::new();
        let token = issue_token();
        store.store(&token, &profile(1, Role::User)).await.unwrap();

        // Touch the session every 90 minutes; after ten rounds we are far
        // past the two-hour window measured from login.
        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(90 * 60)).await;
            assert!(store.resolve(&token).await.unwrap().is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire_after_the_ttl() {
        let store = MemorySessionStore::new();
        let token = issue_token();
        store.store(&token, &profile(1, Role::User)).await.unwrap();

        tokio::time::advance(SESSION_TTL + Duration::from_secs(1)).await;
        assert!(store.resolve(&token).await.unwrap().is_none());
        assert_eq!(store.live_sessions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn renewal_never_shortens_validity() {
        let store = MemorySessionStore::new();
        let token = issue_token();
        store.store(&token, &profile(1, Role::User)).await.unwrap();

        // Resolve just before expiry, then confirm the full window is
        // available again.
        tokio::time::advance(SESSION_TTL - Duration::from_secs(1)).await;
        assert!(store.resolve(&token).await.unwrap().is_some());
        tokio::time::advance(SESSION_TTL - Duration::from_secs(1)).await;
        assert!(store.resolve(&token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn tokens_map_to_their_own_identity() {
        let store = MemorySessionStore::new();
        let token_a = issue_token();
        let token_b = issue_token();
        store.store(&token_a, &profile(1, Role::User)).await.unwrap();
        store.store(&token_b, &profile(2, Role::Admin)).await.unwrap();

        assert_eq!(store.resolve(&token_a).await.unwrap().unwrap().id, 1);
        assert_eq!(store.resolve(&token_b).await.unwrap().unwrap().id, 2);
    }
}
