use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// User role enum matching database enum.
///
/// Variants are declared alphabetically so Rust ordering agrees with the
/// Postgres enum ordering used by `ORDER BY role`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Type,
    ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Citizen,
    Officer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Citizen => write!(f, "citizen"),
            UserRole::Officer => write!(f, "officer"),
        }
    }
}

/// Database model for user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub role: UserRole,
    pub is_anonymous: bool,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub hashed_device_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User count for one (role, anonymity, whole-days account age) combination
#[derive(Debug, Clone, FromRow)]
pub struct UserAgeBucket {
    pub role: UserRole,
    pub is_anonymous: bool,
    pub age_days: i64,
    pub user_count: i64,
}
