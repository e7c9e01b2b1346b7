use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::{InsertOutcome, ReportRepository};
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    Report, ReportAttachment, ReportFilter, ReportStatus, ReportWithAttachments,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    pub reports: Vec<Report>,
    pub attachments: Vec<ReportAttachment>,
}

/// In-memory report tables for tests.
///
/// Writes stage changes on a copy of the tables and swap it in on success,
/// so a failed write leaves nothing behind.
#[derive(Default)]
pub struct InMemoryReportRepository {
    pub tables: Mutex<MemoryTables>,
    /// Fail while inserting the attachment at this position.
    pub fail_attachment_at: Option<usize>,
}

impl InMemoryReportRepository {
    pub fn failing_attachment_at(index: usize) -> Self {
        Self {
            tables: Mutex::new(MemoryTables::default()),
            fail_attachment_at: Some(index),
        }
    }

    fn with_attachments(tables: &MemoryTables, report: Report) -> ReportWithAttachments {
        let attachments = tables
            .attachments
            .iter()
            .filter(|a| a.report_id == report.report_id)
            .cloned()
            .collect();
        ReportWithAttachments {
            report,
            attachments,
        }
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert_with_attachments(
        &self,
        report: &Report,
        attachments: &[ReportAttachment],
    ) -> Result<InsertOutcome> {
        let mut tables = self.tables.lock().await;
        let mut staged = tables.clone();

        if staged.reports.iter().any(|r| r.report_id == report.report_id) {
            return Ok(InsertOutcome::DuplicateId);
        }
        staged.reports.push(report.clone());

        for (index, attachment) in attachments.iter().enumerate() {
            if self.fail_attachment_at == Some(index) {
                return Err(AppError::Database(sqlx::Error::Protocol(
                    "attachment insert failed".to_string(),
                )));
            }
            staged.attachments.push(attachment.clone());
        }

        *tables = staged;
        Ok(InsertOutcome::Inserted(ReportWithAttachments {
            report: report.clone(),
            attachments: attachments.to_vec(),
        }))
    }

    async fn find_by_id(&self, report_id: &str) -> Result<Option<ReportWithAttachments>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .reports
            .iter()
            .find(|r| r.report_id == report_id)
            .cloned()
            .map(|r| Self::with_attachments(&tables, r)))
    }

    async fn list(
        &self,
        filter: ReportFilter,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ReportWithAttachments>, i64)> {
        let tables = self.tables.lock().await;

        let mut matching: Vec<Report> = tables
            .reports
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.report_id.cmp(&a.report_id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|r| Self::with_attachments(&tables, r))
            .collect();

        Ok((page, total))
    }

    async fn update_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<ReportWithAttachments>> {
        let mut tables = self.tables.lock().await;
        let Some(report) = tables.reports.iter_mut().find(|r| r.report_id == report_id) else {
            return Ok(None);
        };

        report.status = status;
        report.updated_at = at.max(report.updated_at + Duration::microseconds(1));
        let report = report.clone();

        Ok(Some(Self::with_attachments(&tables, report)))
    }

    async fn delete_with_attachments(&self, report_id: &str) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.reports.len();

        tables.attachments.retain(|a| a.report_id != report_id);
        tables.reports.retain(|r| r.report_id != report_id);

        Ok(tables.reports.len() < before)
    }
}
