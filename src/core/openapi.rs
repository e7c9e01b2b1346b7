use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{
    dtos as analytics_dtos, handlers as analytics_handlers, models as analytics_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::delete_report,
        // Analytics (admin)
        analytics_handlers::get_dashboard_stats,
        analytics_handlers::get_monthly_breakdown,
        analytics_handlers::get_user_demographics,
        analytics_handlers::list_users,
        analytics_handlers::export_csv,
        // Users
        users_handlers::get_me,
        users_handlers::assign_role,
    ),
    components(
        schemas(
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_models::ReportCategory,
            reports_models::FileType,
            reports_dtos::CreateReportDto,
            reports_dtos::CreateAttachmentDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::AttachmentResponseDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportListResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportListResponseDto>,
            // Analytics
            analytics_models::FactSource,
            analytics_dtos::MonthlyCategoryCountDto,
            analytics_dtos::UserDemographicDto,
            analytics_dtos::DashboardStatsDto,
            ApiResponse<analytics_dtos::DashboardStatsDto>,
            ApiResponse<Vec<analytics_dtos::MonthlyCategoryCountDto>>,
            ApiResponse<Vec<analytics_dtos::UserDemographicDto>>,
            // Users
            users_models::UserRole,
            users_dtos::AssignRoleDto,
            users_dtos::UserResponseDto,
            users_dtos::CurrentUserDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            ApiResponse<users_dtos::CurrentUserDto>,
        )
    ),
    tags(
        (name = "reports", description = "Citizen incident reports and attachments"),
        (name = "analytics", description = "Dashboard analytics over hot and cold report facts (admin only)"),
        (name = "users", description = "Caller identity and role assignment"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Incident Reporting API",
        version = "0.1.0",
        description = "API documentation for the incident reporting backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/reports",
            "/api/reports/{id}",
            "/api/reports/{id}/status",
            "/api/analytics/dashboard/stats",
            "/api/analytics/export",
            "/api/users/{id}/role",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Ops".to_string(),
            version: "9.9.9".to_string(),
            description: "internal".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Ops");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
