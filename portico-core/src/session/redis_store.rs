use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, warn};

use super::{SESSION_TTL, SessionStore, SessionStoreError};
use crate::user::UserProfile;

/// Redis-backed [`SessionStore`]. Single source of truth for live sessions;
/// expiry is delegated to Redis key TTLs (`SET .. EX` / `EXPIRE`).
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore").finish()
    }
}

impl RedisSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Open a client and connection manager for the given URL.
    pub async fn connect(redis_url: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self::new(redis))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn store(&self, token: &str, profile: &UserProfile) -> Result<(), SessionStoreError> {
        let payload = serde_json::to_string(profile)?;
        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(token, payload, SESSION_TTL.as_secs())
            .await?;
        debug!(user_id = profile.id, "session stored");
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<Option<UserProfile>, SessionStoreError> {
        let mut conn = self.redis.clone();
        let payload: Option<String> = conn.get(token).await?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        let profile = match serde_json::from_str::<UserProfile>(&payload) {
            Ok(profile) => profile,
            Err(err) => {
                // A stale or corrupt record is "not authenticated", not a
                // server fault.
                warn!(error = %err, "discarding undeserializable session record");
                return Ok(None);
            }
        };

        // Sliding expiration: reset the TTL to the full window on every
        // successful read.
        conn.expire::<_, ()>(token, SESSION_TTL.as_secs() as i64)
            .await?;

        Ok(Some(profile))
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(token).await?;
        debug!("session revoked");
        Ok(())
    }
}
