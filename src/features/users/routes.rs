use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

/// Create routes for the users feature (require auth middleware applied by caller)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", get(handlers::get_me))
        .route("/api/users/{id}/role", put(handlers::assign_role))
        .with_state(service)
}
