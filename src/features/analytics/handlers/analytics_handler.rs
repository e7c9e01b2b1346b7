use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::core::error::Result;
use crate::features::analytics::dtos::{
    DashboardStatsDto, MonthlyCategoryCountDto, UserDemographicDto,
};
use crate::features::analytics::models::FactSource;
use crate::features::analytics::services::AnalyticsService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::{ApiResponse, Meta};

const CSV_EXPORT_FILENAME: &str = "attachment; filename=analytics_export.csv";

/// Dashboard KPIs, breakdowns, demographics and users in one call
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard bundle", body = ApiResponse<DashboardStatsDto>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_dashboard_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>> {
    let stats = service.dashboard_stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Monthly category counts from the hot or cold store
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard/{source}/monthly-category-breakdown",
    params(
        ("source" = FactSource, Path, description = "hot or cold")
    ),
    responses(
        (status = 200, description = "Counts ordered by year then month", body = ApiResponse<Vec<MonthlyCategoryCountDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_monthly_breakdown(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Path(source): Path<FactSource>,
) -> Result<Json<ApiResponse<Vec<MonthlyCategoryCountDto>>>> {
    let rows = service.monthly_breakdown(source).await?;
    Ok(Json(ApiResponse::success(Some(rows), None, None)))
}

/// Users by role, anonymity and account age
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard/users/demographic-breakdown",
    responses(
        (status = 200, description = "Demographic breakdown", body = ApiResponse<Vec<UserDemographicDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_user_demographics(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<Vec<UserDemographicDto>>>> {
    let rows = service.user_demographics().await?;
    Ok(Json(ApiResponse::success(Some(rows), None, None)))
}

/// All users, newest first
#[utoipa::path(
    get,
    path = "/api/analytics/users",
    responses(
        (status = 200, description = "Users list", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = service.users_list().await?;
    let total = users.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

/// Download recent hot reports as CSV
#[utoipa::path(
    get,
    path = "/api/analytics/export",
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn export_csv(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<impl IntoResponse> {
    let csv = service.csv_export().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, CSV_EXPORT_FILENAME),
        ],
        csv,
    ))
}
