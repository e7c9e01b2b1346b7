use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Create routes for the analytics feature (require auth middleware applied by caller)
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route(
            "/api/analytics/dashboard/stats",
            get(handlers::get_dashboard_stats),
        )
        .route(
            "/api/analytics/dashboard/users/demographic-breakdown",
            get(handlers::get_user_demographics),
        )
        .route(
            "/api/analytics/dashboard/{source}/monthly-category-breakdown",
            get(handlers::get_monthly_breakdown),
        )
        .route("/api/analytics/users", get(handlers::list_users))
        .route("/api/analytics/export", get(handlers::export_csv))
        .with_state(service)
}
