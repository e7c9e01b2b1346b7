use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Public routes (optional auth middleware applied by caller)
pub fn public_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(service)
}

/// Protected routes (require auth middleware applied by caller)
pub fn protected_routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/{id}/status",
            put(handlers::update_report_status),
        )
        .route(
            "/api/reports/{id}",
            axum::routing::delete(handlers::delete_report),
        )
        .with_state(service)
}
