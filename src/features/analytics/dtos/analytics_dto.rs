use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::analytics::models::MonthlyCategoryCount;
use crate::features::reports::models::ReportCategory;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;

/// Reports per month and category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyCategoryCountDto {
    pub year: i32,
    pub month: i32,
    pub category: ReportCategory,
    pub count: i64,
}

impl From<MonthlyCategoryCount> for MonthlyCategoryCountDto {
    fn from(m: MonthlyCategoryCount) -> Self {
        Self {
            year: m.year,
            month: m.month,
            category: m.category,
            count: m.count,
        }
    }
}

/// Users per role, anonymity and account age segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDemographicDto {
    pub role: UserRole,
    pub is_anonymous: bool,
    pub account_age_segment: String,
    pub user_count: i64,
}

/// Admin dashboard bundle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    /// Hot plus cold
    pub total_reports: i64,
    pub hot_reports: i64,
    /// Zero when the cold store is unavailable
    pub cold_reports: i64,
    /// Hot data only
    pub status_breakdown: BTreeMap<String, i64>,
    /// Hot data only
    pub category_breakdown: BTreeMap<String, i64>,
    pub avg_ai_confidence: f64,
    pub anonymous_reports: i64,
    pub registered_reports: i64,
    pub hot_monthly_category_counts: Vec<MonthlyCategoryCountDto>,
    pub cold_monthly_category_counts: Vec<MonthlyCategoryCountDto>,
    pub demographic_counts: Vec<UserDemographicDto>,
    pub users_list: Vec<UserResponseDto>,
}
