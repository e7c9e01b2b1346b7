use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;
use crate::features::users::repositories::UserRepository;

/// Service for user role management
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Assign `role` to `target_user_id`.
    ///
    /// Only admins may assign roles, and an admin can never remove their own
    /// admin role through this operation.
    pub async fn assign_role(
        &self,
        caller: &AuthenticatedUser,
        target_user_id: &str,
        role: UserRole,
    ) -> Result<UserResponseDto> {
        if !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Not authorized. Admin privileges required.".to_string(),
            ));
        }

        if caller.user_id == target_user_id && role != UserRole::Admin {
            return Err(AppError::InvalidOperation(
                "You cannot demote yourself.".to_string(),
            ));
        }

        let user = self
            .users
            .update_role(target_user_id, role)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", target_user_id)))?;

        tracing::info!(
            "User {} assigned role {} to user {}",
            caller.user_id,
            role,
            target_user_id
        );

        Ok(user.into())
    }
}
