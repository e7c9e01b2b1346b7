//! Role-based authorization guards.
//!
//! These guards extract the authenticated user and verify they hold the
//! required role:
//! - admin: analytics, role assignment, report deletion
//! - officer (or admin): report triage

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<&AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthenticated("User not authenticated".to_string()))
}

/// Guard for checking if user is admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

/// Guard for checking if user has officer level access.
///
/// Allows users with "officer" or "admin" roles.
pub struct RequireOfficer(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOfficer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_officer_access() {
            return Err(AppError::Forbidden("Officer access required".to_string()));
        }

        Ok(RequireOfficer(user.clone()))
    }
}
