//! Admin analytics over the hot/cold report fact tables and the user table.
//!
//! ## Endpoints (admin only)
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/analytics/dashboard/stats` | KPI bundle |
//! | GET | `/api/analytics/dashboard/{hot,cold}/monthly-category-breakdown` | Monthly counts |
//! | GET | `/api/analytics/dashboard/users/demographic-breakdown` | Users by role, anonymity, age |
//! | GET | `/api/analytics/users` | Users list |
//! | GET | `/api/analytics/export` | CSV download |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{AnalyticsRepository, PgAnalyticsRepository};
pub use services::AnalyticsService;
