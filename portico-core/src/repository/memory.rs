use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{NewUser, Page, UserQuery, UserRepository, UserUpdate};
use crate::error::{CoreError, Result};
use crate::user::User;

/// In-memory [`UserRepository`] used by tests and local experimentation.
/// Mirrors the Postgres adapter's semantics, including logical deletes and
/// the duplicate-account conflict.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully formed user row, e.g. an admin fixture. Returns its id.
    pub fn seed(&self, mut user: User) -> i64 {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        user.id = inner.next_id;
        let id = user.id;
        inner.users.push(user);
        id
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_account(&self, account: &str) -> Result<Option<User>> {
        let inner = self.inner.lock();
        Ok(inner
            .users
            .iter()
            .find(|user| !user.is_delete && user.user_account == account)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let inner = self.inner.lock();
        Ok(inner
            .users
            .iter()
            .find(|user| !user.is_delete && user.id == id)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<i64> {
        let mut inner = self.inner.lock();
        if inner
            .users
            .iter()
            .any(|user| !user.is_delete && user.user_account == new_user.user_account)
        {
            return Err(CoreError::conflict("account already exists"));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();
        inner.users.push(User {
            id,
            username: None,
            user_account: new_user.user_account,
            avatar_url: None,
            gender: None,
            user_password: new_user.password_hash,
            phone: None,
            email: None,
            user_status: "active".to_string(),
            user_role: "user".to_string(),
            created_at: now,
            updated_at: now,
            is_delete: false,
        });
        Ok(id)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<bool> {
        let mut inner = self.inner.lock();
        let Some(user) = inner
            .users
            .iter_mut()
            .find(|user| !user.is_delete && user.id == id)
        else {
            return Ok(false);
        };
        if let Some(username) = changes.username {
            user.username = Some(username);
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(gender) = changes.gender {
            user.gender = Some(gender);
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(email) = changes.email {
            user.email = Some(email);
        }
        if let Some(status) = changes.user_status {
            user.user_status = status;
        }
        if let Some(role) = changes.user_role {
            user.user_role = role.as_str().to_string();
        }
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock();
        let Some(user) = inner
            .users
            .iter_mut()
            .find(|user| !user.is_delete && user.id == id)
        else {
            return Ok(false);
        };
        user.is_delete = true;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn page(&self, query: UserQuery) -> Result<Page<User>> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 100);
        let filter = query
            .username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.to_lowercase());

        let inner = self.inner.lock();
        let matching: Vec<&User> = inner
            .users
            .iter()
            .filter(|user| !user.is_delete)
            .filter(|user| match &filter {
                Some(needle) => user
                    .username
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(needle)),
                None => true,
            })
            .collect();
        let total = matching.len() as i64;
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let records = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(Page {
            records,
            total,
            page,
            page_size,
        })
    }
}
