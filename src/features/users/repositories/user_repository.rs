use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{User, UserAgeBucket, UserRole};

/// Column list for the `users` table.
const COLUMNS: &str =
    "user_id, role, is_anonymous, email, phone_number, hashed_device_id, created_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Set the role of a user, `None` when the user does not exist.
    async fn update_role(&self, user_id: &str, role: UserRole) -> Result<Option<User>>;

    /// All users, newest account first.
    async fn list_all(&self) -> Result<Vec<User>>;

    /// User counts grouped by role, anonymity and account age in whole days at `now`.
    async fn age_buckets(&self, now: DateTime<Utc>) -> Result<Vec<UserAgeBucket>>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn update_role(&self, user_id: &str, role: UserRole) -> Result<Option<User>> {
        let query = format!("UPDATE users SET role = $2 WHERE user_id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user role: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn age_buckets(&self, now: DateTime<Utc>) -> Result<Vec<UserAgeBucket>> {
        sqlx::query_as::<_, UserAgeBucket>(
            r#"
            SELECT
                role,
                is_anonymous,
                FLOOR(EXTRACT(EPOCH FROM ($1 - created_at)) / 86400)::BIGINT AS age_days,
                COUNT(*)::BIGINT AS user_count
            FROM users
            GROUP BY role, is_anonymous, age_days
            ORDER BY role, is_anonymous, age_days
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to group users by account age: {:?}", e);
            AppError::Database(e)
        })
    }
}
