use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::analytics::models::{
    CategoryCount, FactSource, HotSummary, MonthlyCategoryCount, ReportFact, StatusCount,
};

/// Read-only access to the hot and cold report fact tables
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn count(&self, source: FactSource) -> Result<i64>;

    async fn hot_summary(&self) -> Result<HotSummary>;

    async fn hot_status_counts(&self) -> Result<Vec<StatusCount>>;

    async fn hot_category_counts(&self) -> Result<Vec<CategoryCount>>;

    /// Counts grouped by UTC year, month and category, ascending on all three.
    async fn monthly_category_counts(&self, source: FactSource)
        -> Result<Vec<MonthlyCategoryCount>>;

    /// Most recent hot facts first, at most `limit` rows.
    async fn recent_hot_facts(&self, limit: i64) -> Result<Vec<ReportFact>>;
}

/// Fact tables on the analytics pool
pub struct PgAnalyticsRepository {
    pool: PgPool,
}

impl PgAnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn count(&self, source: FactSource) -> Result<i64> {
        let query = format!("SELECT COUNT(*) FROM {}", source.table());
        sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count {} facts: {:?}", source, e);
                AppError::Database(e)
            })
    }

    async fn hot_summary(&self) -> Result<HotSummary> {
        sqlx::query_as::<_, HotSummary>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_anonymous) AS anonymous,
                AVG(ai_confidence) AS avg_ai_confidence
            FROM hot_fact_reports
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to summarize hot facts: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn hot_status_counts(&self) -> Result<Vec<StatusCount>> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM hot_fact_reports
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count hot facts by status: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn hot_category_counts(&self) -> Result<Vec<CategoryCount>> {
        sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category_id AS category, COUNT(*) AS count
            FROM hot_fact_reports
            GROUP BY category_id
            ORDER BY category_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count hot facts by category: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn monthly_category_counts(
        &self,
        source: FactSource,
    ) -> Result<Vec<MonthlyCategoryCount>> {
        let query = format!(
            r#"
            SELECT
                EXTRACT(YEAR FROM created_at AT TIME ZONE 'UTC')::INT AS year,
                EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::INT AS month,
                category_id AS category,
                COUNT(*) AS count
            FROM {}
            GROUP BY 1, 2, 3
            ORDER BY 1, 2, 3
            "#,
            source.table()
        );

        sqlx::query_as::<_, MonthlyCategoryCount>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to build {} monthly breakdown: {:?}", source, e);
                AppError::Database(e)
            })
    }

    async fn recent_hot_facts(&self, limit: i64) -> Result<Vec<ReportFact>> {
        sqlx::query_as::<_, ReportFact>(
            r#"
            SELECT report_id, title, status, category_id, ai_confidence, is_anonymous, created_at
            FROM hot_fact_reports
            ORDER BY created_at DESC, report_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch recent hot facts: {:?}", e);
            AppError::Database(e)
        })
    }
}

// Run against a live database: `DATABASE_URL=... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportCategory, ReportStatus};
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    async fn seed(
        pool: &PgPool,
        source: FactSource,
        rows: &[(&str, ReportCategory, Option<f64>, bool, DateTime<Utc>)],
    ) {
        let query = format!(
            "INSERT INTO {} \
                (report_id, title, status, category_id, ai_confidence, is_anonymous, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            source.table()
        );
        for (id, category, confidence, anonymous, created_at) in rows {
            sqlx::query(&query)
                .bind(*id)
                .bind(format!("Report {}", id))
                .bind(ReportStatus::Submitted)
                .bind(*category)
                .bind(*confidence)
                .bind(*anonymous)
                .bind(*created_at)
                .execute(pool)
                .await
                .unwrap();
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_monthly_counts_group_by_utc_month(pool: PgPool) {
        use ReportCategory::{Crime, Traffic};

        seed(
            &pool,
            FactSource::Hot,
            &[
                ("R-1", Traffic, None, false, utc(2025, 1, 31, 23, 30)),
                ("R-2", Traffic, None, false, utc(2025, 2, 1, 0, 30)),
                ("R-3", Crime, None, false, utc(2025, 2, 14, 8, 0)),
                ("R-4", Traffic, None, false, utc(2025, 2, 28, 23, 59)),
                ("R-5", Crime, None, false, utc(2024, 12, 31, 23, 59)),
            ],
        )
        .await;
        let repo = PgAnalyticsRepository::new(pool);

        let rows = repo
            .monthly_category_counts(FactSource::Hot)
            .await
            .unwrap();
        let keys: Vec<(i32, i32, ReportCategory, i64)> = rows
            .into_iter()
            .map(|r| (r.year, r.month, r.category, r.count))
            .collect();

        assert_eq!(
            keys,
            vec![
                (2024, 12, Crime, 1),
                (2025, 1, Traffic, 1),
                (2025, 2, Crime, 1),
                (2025, 2, Traffic, 2),
            ]
        );
        assert!(repo
            .monthly_category_counts(FactSource::Cold)
            .await
            .unwrap()
            .is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_hot_summary_and_counts(pool: PgPool) {
        use ReportCategory::{Other, Traffic};

        seed(
            &pool,
            FactSource::Hot,
            &[
                ("R-1", Traffic, Some(0.9), true, utc(2025, 3, 1, 9, 0)),
                ("R-2", Traffic, Some(0.5), false, utc(2025, 3, 2, 9, 0)),
                ("R-3", Other, None, false, utc(2025, 3, 3, 9, 0)),
            ],
        )
        .await;
        seed(
            &pool,
            FactSource::Cold,
            &[("R-0", Other, None, false, utc(2023, 1, 1, 9, 0))],
        )
        .await;
        let repo = PgAnalyticsRepository::new(pool);

        assert_eq!(repo.count(FactSource::Hot).await.unwrap(), 3);
        assert_eq!(repo.count(FactSource::Cold).await.unwrap(), 1);

        let summary = repo.hot_summary().await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.anonymous, 1);
        let avg = summary.avg_ai_confidence.unwrap();
        assert!((avg - 0.7).abs() < 1e-9);

        let categories = repo.hot_category_counts().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, Other);
        assert_eq!(categories[0].count, 1);
        assert_eq!(categories[1].category, Traffic);
        assert_eq!(categories[1].count, 2);

        let recent = repo.recent_hot_facts(2).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|f| f.report_id.as_str()).collect();
        assert_eq!(ids, vec!["R-3", "R-2"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn test_empty_hot_table_has_no_average(pool: PgPool) {
        let summary = PgAnalyticsRepository::new(pool).hot_summary().await.unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.avg_ai_confidence.is_none());
    }
}
