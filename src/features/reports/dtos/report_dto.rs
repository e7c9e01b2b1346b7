use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::reports::models::{
    FileType, ReportAttachment, ReportCategory, ReportStatus, ReportWithAttachments,
};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_ATTACHMENT_SIZE_BYTES};
use crate::shared::types::PageInfo;
use crate::shared::validation::MIME_TYPE_REGEX;

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request DTO for submitting a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    #[validate(length(min = 3, max = 500, message = "Title must be 3-500 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description_text: String,

    /// Defaults to `other`
    pub category_id: Option<ReportCategory>,

    /// Free-text location as typed by the reporter
    #[validate(length(min = 1, max = 2048, message = "Location must be 1-2048 characters"))]
    pub location: String,

    pub transcribed_voice_text: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,

    /// Correlates anonymous submissions from one device; not stored
    pub hashed_device_id: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub attachments: Vec<CreateAttachmentDto>,
}

/// Attachment metadata supplied on report creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttachmentDto {
    #[validate(
        url(message = "Invalid blob storage URI"),
        length(max = 2048, message = "Blob storage URI must be at most 2048 characters")
    )]
    pub blob_storage_uri: String,

    #[validate(
        regex(path = *MIME_TYPE_REGEX, message = "MIME type must look like type/subtype"),
        length(max = 100, message = "MIME type must be at most 100 characters")
    )]
    pub mime_type: String,

    pub file_type: FileType,

    #[validate(range(
        min = 1,
        max = MAX_ATTACHMENT_SIZE_BYTES,
        message = "File size must be between 1 byte and 50MB"
    ))]
    pub file_size_bytes: i64,
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
    /// Accepted for forward compatibility, currently discarded
    pub notes: Option<String>,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query params for listing reports
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Number of reports to skip
    #[serde(default)]
    #[param(minimum = 0)]
    pub skip: i64,
    /// Page size
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
    /// Filter by status
    pub status: Option<ReportStatus>,
    /// Filter by category
    pub category: Option<ReportCategory>,
}

impl Default for ListReportsQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
            status: None,
            category: None,
        }
    }
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// Response DTO for attachment metadata
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponseDto {
    pub attachment_id: String,
    pub report_id: String,
    pub blob_storage_uri: String,
    pub mime_type: String,
    pub file_type: FileType,
    pub file_size_bytes: i64,
}

impl From<ReportAttachment> for AttachmentResponseDto {
    fn from(a: ReportAttachment) -> Self {
        Self {
            attachment_id: a.attachment_id,
            report_id: a.report_id,
            blob_storage_uri: a.blob_storage_uri,
            mime_type: a.mime_type,
            file_type: a.file_type,
            file_size_bytes: a.file_size_bytes,
        }
    }
}

/// Response DTO for report. The stored `location_raw` is exposed as `location`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub report_id: String,
    pub title: String,
    pub description_text: String,
    pub category_id: ReportCategory,
    pub status: ReportStatus,
    pub location: String,
    pub ai_confidence: Option<f64>,
    pub transcribed_voice_text: Option<String>,
    pub user_id: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attachments: Vec<AttachmentResponseDto>,
}

impl From<ReportWithAttachments> for ReportResponseDto {
    fn from(r: ReportWithAttachments) -> Self {
        let is_anonymous = r.report.is_anonymous();
        let report = r.report;
        Self {
            report_id: report.report_id,
            title: report.title,
            description_text: report.description_text,
            category_id: report.category_id,
            status: report.status,
            location: report.location_raw,
            ai_confidence: report.ai_confidence,
            transcribed_voice_text: report.transcribed_voice_text,
            user_id: report.user_id,
            is_anonymous,
            created_at: report.created_at,
            updated_at: report.updated_at,
            attachments: r.attachments.into_iter().map(Into::into).collect(),
        }
    }
}

/// One page of reports with pagination summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponseDto {
    pub reports: Vec<ReportResponseDto>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl ReportListResponseDto {
    pub fn new(reports: Vec<ReportResponseDto>, total: i64, page: PageInfo) -> Self {
        Self {
            reports,
            total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}
