use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireOfficer};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, ListReportsQuery, ReportListResponseDto, ReportResponseDto,
    UpdateReportStatusDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a report. A bearer token is optional.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid bearer token")
    ),
    security((), ("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn create_report(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let report = service.create(dto, user.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// List reports, most recent first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Page of reports", body = ApiResponse<ReportListResponseDto>),
        (status = 400, description = "Invalid paging parameters")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<ReportListResponseDto>>> {
    let page = service.list(query).await?;
    let total = page.total;
    Ok(Json(ApiResponse::success(
        Some(page),
        None,
        Some(Meta { total }),
    )))
}

/// Get report by ID with attachments
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID, e.g. R-1A2B3C4D")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get(&id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update report status (officer or admin)
#[utoipa::path(
    put,
    path = "/api/reports/{id}/status",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Officer access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireOfficer(user): RequireOfficer,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(&id, dto, &user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a report and its attachments (admin only)
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = String, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    if !service.delete(&id).await? {
        return Err(AppError::NotFound(format!("Report {} not found", id)));
    }

    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted successfully".to_string()),
        None,
    )))
}
