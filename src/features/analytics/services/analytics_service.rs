use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::core::error::Result;
use crate::features::analytics::dtos::{
    DashboardStatsDto, MonthlyCategoryCountDto, UserDemographicDto,
};
use crate::features::analytics::models::{AccountAgeSegment, FactSource, ReportFact};
use crate::features::analytics::repositories::AnalyticsRepository;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;
use crate::features::users::repositories::UserRepository;
use crate::shared::constants::CSV_EXPORT_ROW_LIMIT;

const CSV_HEADER: &str = "ReportId,Title,Status,Category,Confidence,IsAnonymous,CreatedAt";

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fact: &ReportFact) -> String {
    format!(
        "{},{},{},{},{},{},{}\n",
        csv_escape(&fact.report_id),
        csv_escape(&fact.title),
        fact.status,
        fact.category_id,
        fact.ai_confidence.map_or(String::new(), |c| c.to_string()),
        fact.is_anonymous,
        fact.created_at.to_rfc3339(),
    )
}

/// Dashboard rollups over the hot/cold fact tables and the user table.
///
/// Hot reads propagate failures. Cold reads degrade to zero or empty.
pub struct AnalyticsService {
    facts: Arc<dyn AnalyticsRepository>,
    users: Arc<dyn UserRepository>,
}

impl AnalyticsService {
    pub fn new(facts: Arc<dyn AnalyticsRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { facts, users }
    }

    /// Never fails; an unreachable cold store counts as empty.
    async fn cold_count(&self) -> Result<i64> {
        match self.facts.count(FactSource::Cold).await {
            Ok(count) => Ok(count),
            Err(e) => {
                tracing::warn!("Cold store unavailable, counting it as empty: {}", e);
                Ok(0)
            }
        }
    }

    /// KPI bundle for the admin dashboard
    pub async fn dashboard_stats(&self) -> Result<DashboardStatsDto> {
        let (
            summary,
            statuses,
            categories,
            hot_monthly,
            cold_monthly,
            demographics,
            users,
            cold_reports,
        ) = tokio::try_join!(
            self.facts.hot_summary(),
            self.facts.hot_status_counts(),
            self.facts.hot_category_counts(),
            self.monthly_breakdown(FactSource::Hot),
            self.monthly_breakdown(FactSource::Cold),
            self.user_demographics(),
            self.users_list(),
            self.cold_count(),
        )?;

        Ok(DashboardStatsDto {
            total_reports: summary.total + cold_reports,
            hot_reports: summary.total,
            cold_reports,
            status_breakdown: statuses
                .into_iter()
                .map(|s| (s.status.to_string(), s.count))
                .collect(),
            category_breakdown: categories
                .into_iter()
                .map(|c| (c.category.to_string(), c.count))
                .collect(),
            avg_ai_confidence: summary.avg_ai_confidence.unwrap_or(0.0),
            anonymous_reports: summary.anonymous,
            registered_reports: summary.total - summary.anonymous,
            hot_monthly_category_counts: hot_monthly,
            cold_monthly_category_counts: cold_monthly,
            demographic_counts: demographics,
            users_list: users,
        })
    }

    /// Monthly category counts, ascending by year then month
    pub async fn monthly_breakdown(
        &self,
        source: FactSource,
    ) -> Result<Vec<MonthlyCategoryCountDto>> {
        let rows = match self.facts.monthly_category_counts(source).await {
            Ok(rows) => rows,
            Err(e) if source == FactSource::Cold => {
                tracing::warn!("Cold store unavailable, returning empty breakdown: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Users grouped by role, anonymity and account age segment
    pub async fn user_demographics(&self) -> Result<Vec<UserDemographicDto>> {
        let buckets = self.users.age_buckets(Utc::now()).await?;

        // Segments order by their label text, not by age.
        let mut grouped: BTreeMap<(UserRole, bool, &'static str), i64> = BTreeMap::new();
        for bucket in buckets {
            let segment = AccountAgeSegment::from_age_days(bucket.age_days).label();
            *grouped
                .entry((bucket.role, bucket.is_anonymous, segment))
                .or_default() += bucket.user_count;
        }

        Ok(grouped
            .into_iter()
            .map(|((role, is_anonymous, segment), user_count)| UserDemographicDto {
                role,
                is_anonymous,
                account_age_segment: segment.to_string(),
                user_count,
            })
            .collect())
    }

    /// All users, newest first
    pub async fn users_list(&self) -> Result<Vec<UserResponseDto>> {
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Most recent hot reports as CSV, capped at the export row limit
    pub async fn csv_export(&self) -> Result<String> {
        let facts = self.facts.recent_hot_facts(CSV_EXPORT_ROW_LIMIT).await?;

        let mut csv = String::with_capacity((facts.len() + 1) * 96);
        csv.push_str(CSV_HEADER);
        csv.push('\n');
        for fact in &facts {
            csv.push_str(&csv_row(fact));
        }

        tracing::info!("Exported {} hot report(s) to CSV", facts.len());
        Ok(csv)
    }
}
