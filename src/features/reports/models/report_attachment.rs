use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Attachment media kind matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "attachment_file_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
}

/// Database model for report attachment (metadata only, never bytes)
#[derive(Debug, Clone, FromRow)]
pub struct ReportAttachment {
    pub attachment_id: String,
    pub report_id: String,
    pub blob_storage_uri: String,
    pub mime_type: String,
    pub file_type: FileType,
    pub file_size_bytes: i64,
}

/// A report together with all of its attachments, fetched eagerly
#[derive(Debug, Clone)]
pub struct ReportWithAttachments {
    pub report: super::Report,
    pub attachments: Vec<ReportAttachment>,
}
