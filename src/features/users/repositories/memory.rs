use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::UserRepository;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{User, UserAgeBucket, UserRole};

/// In-memory user table for tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
    /// Fail every call with a database error.
    pub unavailable: bool,
}

impl InMemoryUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            unavailable: false,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn update_role(&self, user_id: &str, role: UserRole) -> Result<Option<User>> {
        self.check_available()?;
        let mut users = self.users.lock().await;
        Ok(users.iter_mut().find(|u| u.user_id == user_id).map(|u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        self.check_available()?;
        let mut users = self.users.lock().await.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn age_buckets(&self, now: DateTime<Utc>) -> Result<Vec<UserAgeBucket>> {
        self.check_available()?;
        let users = self.users.lock().await;

        let mut grouped: BTreeMap<(UserRole, bool, i64), i64> = BTreeMap::new();
        for user in users.iter() {
            let age_days = (now - user.created_at).num_days();
            *grouped
                .entry((user.role, user.is_anonymous, age_days))
                .or_default() += 1;
        }

        Ok(grouped
            .into_iter()
            .map(|((role, is_anonymous, age_days), user_count)| UserAgeBucket {
                role,
                is_anonymous,
                age_days,
                user_count,
            })
            .collect())
    }
}
