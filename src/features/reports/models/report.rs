use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Report status enum matching database enum.
///
/// Statuses are a closed set; any status may move to any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "report_status")]
pub enum ReportStatus {
    Submitted,
    Assigned,
    InProgress,
    Resolved,
    Rejected,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Submitted => write!(f, "Submitted"),
            ReportStatus::Assigned => write!(f, "Assigned"),
            ReportStatus::InProgress => write!(f, "InProgress"),
            ReportStatus::Resolved => write!(f, "Resolved"),
            ReportStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Report category enum matching database enum.
///
/// Declared alphabetically so Rust ordering agrees with `ORDER BY category_id`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Type,
    ToSchema,
)]
#[sqlx(type_name = "report_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Crime,
    Environmental,
    Infrastructure,
    #[default]
    Other,
    PublicNuisance,
    Traffic,
    Utilities,
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportCategory::Crime => write!(f, "crime"),
            ReportCategory::Environmental => write!(f, "environmental"),
            ReportCategory::Infrastructure => write!(f, "infrastructure"),
            ReportCategory::Other => write!(f, "other"),
            ReportCategory::PublicNuisance => write!(f, "public_nuisance"),
            ReportCategory::Traffic => write!(f, "traffic"),
            ReportCategory::Utilities => write!(f, "utilities"),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub report_id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description_text: String,
    pub location_raw: String,
    pub status: ReportStatus,
    pub category_id: ReportCategory,
    pub ai_confidence: Option<f64>,
    pub transcribed_voice_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Absence of an owner is authoritative for anonymity in storage.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Equality filters applied to report listings
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub category: Option<ReportCategory>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.status.is_none_or(|s| s == report.status)
            && self.category.is_none_or(|c| c == report.category_id)
    }
}
