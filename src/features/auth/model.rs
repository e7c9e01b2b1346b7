use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::UserRole;

/// Caller identity resolved from a bearer credential
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Officers and admins may triage reports
    pub fn has_officer_access(&self) -> bool {
        matches!(self.role, UserRole::Officer | UserRole::Admin)
    }
}
