//! User persistence port.
//!
//! Handlers depend on [`UserRepository`] as a trait object so tests can swap
//! the Postgres adapter for the in-memory one.

mod memory;
mod postgres;

pub use memory::MemoryUserRepository;
pub use postgres::PostgresUserRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::user::{Role, User};

/// Fields captured at registration. Status and role are always defaulted to
/// `active` / `user` by the adapter.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_account: String,
    pub password_hash: String,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub user_status: Option<String>,
    pub user_role: Option<Role>,
}

/// Pagination request. Pages are 1-based; `username` is a fuzzy filter on
/// the display name.
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub page: u64,
    pub page_size: u64,
    pub username: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            username: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: i64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Persistence port for user records. Logical deletes (`is_delete`) are
/// filtered out by every read.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_account(&self, account: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Insert a new user, returning its id. Duplicate accounts surface as
    /// [`crate::CoreError::Conflict`].
    async fn insert(&self, new_user: NewUser) -> Result<i64>;

    /// Apply a partial update. Returns `false` when no live row matched.
    async fn update(&self, id: i64, changes: UserUpdate) -> Result<bool>;

    /// Logical delete. Returns `false` when no live row matched.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn page(&self, query: UserQuery) -> Result<Page<User>>;
}
