use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::features::reports::models::{ReportCategory, ReportStatus};

/// Which fact table to read.
///
/// `Hot` holds operationally recent reports and is always expected to answer.
/// `Cold` holds history and is read best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    Hot,
    Cold,
}

impl FactSource {
    pub fn table(&self) -> &'static str {
        match self {
            FactSource::Hot => "hot_fact_reports",
            FactSource::Cold => "cold_fact_reports",
        }
    }
}

impl std::fmt::Display for FactSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactSource::Hot => write!(f, "hot"),
            FactSource::Cold => write!(f, "cold"),
        }
    }
}

/// Denormalized report row in a fact table
#[derive(Debug, Clone, FromRow)]
pub struct ReportFact {
    pub report_id: String,
    pub title: String,
    pub status: ReportStatus,
    pub category_id: ReportCategory,
    pub ai_confidence: Option<f64>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Totals over the hot table
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct HotSummary {
    pub total: i64,
    pub anonymous: i64,
    /// `None` when no row carries a confidence
    pub avg_ai_confidence: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StatusCount {
    pub status: ReportStatus,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryCount {
    pub category: ReportCategory,
    pub count: i64,
}

/// Reports per calendar month (UTC) and category
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MonthlyCategoryCount {
    pub year: i32,
    pub month: i32,
    pub category: ReportCategory,
    pub count: i64,
}
