use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::models::{User, UserRole};

/// Request DTO for assigning a role
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignRoleDto {
    pub role: UserRole,
}

/// Response DTO for user. Never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub user_id: String,
    pub role: UserRole,
    pub is_anonymous: bool,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub hashed_device_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            role: u.role,
            is_anonymous: u.is_anonymous,
            email: u.email,
            phone_number: u.phone_number,
            hashed_device_id: u.hashed_device_id,
            created_at: u.created_at,
        }
    }
}

/// Response DTO for the current caller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserDto {
    pub user_id: String,
    pub role: UserRole,
}

impl From<AuthenticatedUser> for CurrentUserDto {
    fn from(u: AuthenticatedUser) -> Self {
        Self {
            user_id: u.user_id,
            role: u.role,
        }
    }
}
