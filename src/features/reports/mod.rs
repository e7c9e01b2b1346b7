//! Citizen reports and their attachments.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Access |
//! |--------|----------|--------|
//! | POST | `/api/reports` | Public, optional bearer token |
//! | GET | `/api/reports` | Public |
//! | GET | `/api/reports/{id}` | Public |
//! | PUT | `/api/reports/{id}/status` | Officer or admin |
//! | DELETE | `/api/reports/{id}` | Admin |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgReportRepository, ReportRepository};
pub use services::ReportService;
