use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{AssignRoleDto, CurrentUserDto, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

/// Resolve the current caller from the bearer token
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current caller", body = ApiResponse<CurrentUserDto>),
        (status = 401, description = "Unauthenticated")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Result<Json<ApiResponse<CurrentUserDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Assign a role to a user (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = AssignRoleDto,
    responses(
        (status = 200, description = "Role assigned", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Admins cannot demote themselves"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn assign_role(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<AssignRoleDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let updated = service.assign_role(&user, &id, dto.role).await?;
    Ok(Json(ApiResponse::success(
        Some(updated),
        Some("Role updated successfully".to_string()),
        None,
    )))
}
