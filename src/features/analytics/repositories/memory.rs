use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Datelike;

use super::AnalyticsRepository;
use crate::core::error::{AppError, Result};
use crate::features::analytics::models::{
    CategoryCount, FactSource, HotSummary, MonthlyCategoryCount, ReportFact, StatusCount,
};

/// In-memory fact tables for tests.
#[derive(Default)]
pub struct InMemoryAnalyticsRepository {
    pub hot: Vec<ReportFact>,
    pub cold: Vec<ReportFact>,
    /// Fail every cold read with a database error.
    pub cold_unavailable: bool,
}

impl InMemoryAnalyticsRepository {
    fn facts(&self, source: FactSource) -> Result<&[ReportFact]> {
        match source {
            FactSource::Hot => Ok(&self.hot),
            FactSource::Cold if self.cold_unavailable => {
                Err(AppError::Database(sqlx::Error::PoolTimedOut))
            }
            FactSource::Cold => Ok(&self.cold),
        }
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalyticsRepository {
    async fn count(&self, source: FactSource) -> Result<i64> {
        Ok(self.facts(source)?.len() as i64)
    }

    async fn hot_summary(&self) -> Result<HotSummary> {
        let confidences: Vec<f64> = self.hot.iter().filter_map(|f| f.ai_confidence).collect();
        let avg_ai_confidence = if confidences.is_empty() {
            None
        } else {
            Some(confidences.iter().sum::<f64>() / confidences.len() as f64)
        };

        Ok(HotSummary {
            total: self.hot.len() as i64,
            anonymous: self.hot.iter().filter(|f| f.is_anonymous).count() as i64,
            avg_ai_confidence,
        })
    }

    async fn hot_status_counts(&self) -> Result<Vec<StatusCount>> {
        let mut counts = BTreeMap::new();
        for fact in &self.hot {
            *counts.entry(fact.status).or_insert(0i64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn hot_category_counts(&self) -> Result<Vec<CategoryCount>> {
        let mut counts = BTreeMap::new();
        for fact in &self.hot {
            *counts.entry(fact.category_id).or_insert(0i64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    async fn monthly_category_counts(
        &self,
        source: FactSource,
    ) -> Result<Vec<MonthlyCategoryCount>> {
        let mut counts = BTreeMap::new();
        for fact in self.facts(source)? {
            let key = (
                fact.created_at.year(),
                fact.created_at.month() as i32,
                fact.category_id,
            );
            *counts.entry(key).or_insert(0i64) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|((year, month, category), count)| MonthlyCategoryCount {
                year,
                month,
                category,
                count,
            })
            .collect())
    }

    async fn recent_hot_facts(&self, limit: i64) -> Result<Vec<ReportFact>> {
        let mut facts = self.hot.clone();
        facts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.report_id.cmp(&a.report_id))
        });
        facts.truncate(limit.max(0) as usize);
        Ok(facts)
    }
}
