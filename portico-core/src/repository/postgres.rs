use async_trait::async_trait;
use sqlx::PgPool;

use super::{NewUser, Page, UserQuery, UserRepository, UserUpdate};
use crate::error::{CoreError, Result};
use crate::user::User;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BIGSERIAL PRIMARY KEY,
    username      TEXT,
    user_account  TEXT NOT NULL UNIQUE,
    avatar_url    TEXT,
    gender        TEXT,
    user_password TEXT NOT NULL,
    phone         TEXT,
    email         TEXT,
    user_status   TEXT NOT NULL DEFAULT 'active',
    user_role     TEXT NOT NULL DEFAULT 'user',
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    is_delete     BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

const USER_COLUMNS: &str = "id, username, user_account, avatar_url, gender, user_password, \
     phone, email, user_status, user_role, created_at, updated_at, is_delete";

#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotently create the `users` table.
    pub async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_account(&self, account: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_account = $1 AND is_delete = FALSE"
        ))
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_delete = FALSE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (user_account, user_password, user_status, user_role)
            VALUES ($1, $2, 'active', 'user')
            RETURNING id
            "#,
        )
        .bind(&new_user.user_account)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CoreError::conflict("account already exists")
            }
            _ => CoreError::from(err),
        })?;
        Ok(id)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username    = COALESCE($2, username),
                avatar_url  = COALESCE($3, avatar_url),
                gender      = COALESCE($4, gender),
                phone       = COALESCE($5, phone),
                email       = COALESCE($6, email),
                user_status = COALESCE($7, user_status),
                user_role   = COALESCE($8, user_role),
                updated_at  = NOW()
            WHERE id = $1 AND is_delete = FALSE
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.avatar_url)
        .bind(changes.gender)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.user_status)
        .bind(changes.user_role.map(|role| role.as_str().to_string()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_delete = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_delete = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, query: UserQuery) -> Result<Page<User>> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 100);
        // Saturate: an absurd page number means an empty page, not an
        // overflow or a negative OFFSET.
        let offset = i64::try_from(page.saturating_sub(1).saturating_mul(page_size))
            .unwrap_or(i64::MAX);
        let pattern = query
            .username
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| format!("%{name}%"));

        let (total, records) = match &pattern {
            Some(pattern) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE is_delete = FALSE AND username ILIKE $1",
                )
                .bind(pattern)
                .fetch_one(&self.pool)
                .await?;
                let records = sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users \
                     WHERE is_delete = FALSE AND username ILIKE $1 \
                     ORDER BY id LIMIT $2 OFFSET $3"
                ))
                .bind(pattern)
                .bind(page_size as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, records)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM users WHERE is_delete = FALSE",
                )
                .fetch_one(&self.pool)
                .await?;
                let records = sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE is_delete = FALSE \
                     ORDER BY id LIMIT $1 OFFSET $2"
                ))
                .bind(page_size as i64)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;
                (total, records)
            }
        };

        Ok(Page {
            records,
            total,
            page,
            page_size,
        })
    }
}
