use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateReportDto, ListReportsQuery, ReportListResponseDto, ReportResponseDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::{
    Report, ReportAttachment, ReportFilter, ReportStatus,
};
use crate::features::reports::repositories::{InsertOutcome, ReportRepository};
use crate::shared::constants::{MAX_PAGE_SIZE, REPORT_ID_ATTEMPTS, REPORT_ID_PREFIX};
use crate::shared::types::PageInfo;

/// Generate a report identifier in format: R-XXXXXXXX (uppercase hex)
fn generate_report_id() -> String {
    let id = Uuid::new_v4();
    format!("{}{}", REPORT_ID_PREFIX, hex::encode_upper(&id.as_bytes()[..4]))
}

pub type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// Service for the report lifecycle
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    next_id: IdGenerator,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self::with_id_generator(reports, Box::new(generate_report_id))
    }

    pub fn with_id_generator(reports: Arc<dyn ReportRepository>, next_id: IdGenerator) -> Self {
        Self { reports, next_id }
    }

    /// Submit a report with its attachments in one transaction.
    ///
    /// The report is linked to `caller` only when a caller is present and did
    /// not ask to stay anonymous.
    pub async fn create(
        &self,
        dto: CreateReportDto,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<ReportResponseDto> {
        dto.validate()?;

        let now = Utc::now();
        let report_id = (self.next_id)();
        let user_id = caller
            .filter(|_| !dto.is_anonymous)
            .map(|u| u.user_id.clone());

        if dto.hashed_device_id.is_some() {
            tracing::debug!("Ignoring hashed device id for report {}", report_id);
        }

        let mut report = Report {
            report_id: report_id.clone(),
            user_id,
            title: dto.title,
            description_text: dto.description_text,
            location_raw: dto.location,
            status: ReportStatus::Submitted,
            category_id: dto.category_id.unwrap_or_default(),
            ai_confidence: None,
            transcribed_voice_text: dto.transcribed_voice_text,
            created_at: now,
            updated_at: now,
        };

        let mut attachments: Vec<ReportAttachment> = dto
            .attachments
            .into_iter()
            .map(|a| ReportAttachment {
                attachment_id: Uuid::new_v4().to_string(),
                report_id: report_id.clone(),
                blob_storage_uri: a.blob_storage_uri,
                mime_type: a.mime_type,
                file_type: a.file_type,
                file_size_bytes: a.file_size_bytes,
            })
            .collect();

        for _ in 0..REPORT_ID_ATTEMPTS {
            match self
                .reports
                .insert_with_attachments(&report, &attachments)
                .await?
            {
                InsertOutcome::Inserted(created) => {
                    tracing::info!(
                        "Created report {} with {} attachment(s)",
                        created.report.report_id,
                        created.attachments.len()
                    );
                    return Ok(created.into());
                }
                InsertOutcome::DuplicateId => {
                    tracing::warn!("Report id {} already taken, regenerating", report.report_id);
                    report.report_id = (self.next_id)();
                    for attachment in &mut attachments {
                        attachment.report_id = report.report_id.clone();
                    }
                }
            }
        }

        tracing::error!(
            "No free report id after {} attempts",
            REPORT_ID_ATTEMPTS
        );
        Err(AppError::Database(sqlx::Error::Protocol(format!(
            "no free report id after {} attempts",
            REPORT_ID_ATTEMPTS
        ))))
    }

    /// Get a report with all of its attachments
    pub async fn get(&self, report_id: &str) -> Result<ReportResponseDto> {
        self.reports
            .find_by_id(report_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))
    }

    /// List reports, most recent first
    pub async fn list(&self, query: ListReportsQuery) -> Result<ReportListResponseDto> {
        if query.skip < 0 {
            return Err(AppError::Validation("skip must be 0 or greater".to_string()));
        }
        if query.limit < 1 || query.limit > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let filter = ReportFilter {
            status: query.status,
            category: query.category,
        };

        let (reports, total) = self.reports.list(filter, query.skip, query.limit).await?;
        let page = PageInfo::from_offset(query.skip, query.limit, total);

        Ok(ReportListResponseDto::new(
            reports.into_iter().map(Into::into).collect(),
            total,
            page,
        ))
    }

    /// Move a report to any status. Notes are accepted and dropped.
    pub async fn update_status(
        &self,
        report_id: &str,
        dto: UpdateReportStatusDto,
        updated_by: &str,
    ) -> Result<ReportResponseDto> {
        if let Some(notes) = dto.notes.as_deref() {
            tracing::debug!(
                "Discarding {} byte(s) of status notes for report {}",
                notes.len(),
                report_id
            );
        }

        let updated = self
            .reports
            .update_status(report_id, dto.status, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

        tracing::info!(
            "Report {} status set to {} by {}",
            report_id,
            dto.status,
            updated_by
        );

        Ok(updated.into())
    }

    /// Delete a report and its attachments. Returns false when nothing matched.
    pub async fn delete(&self, report_id: &str) -> Result<bool> {
        let deleted = self.reports.delete_with_attachments(report_id).await?;

        if deleted {
            tracing::info!("Deleted report {}", report_id);
        }

        Ok(deleted)
    }
}
