mod report;
mod report_attachment;

pub use report::{Report, ReportCategory, ReportFilter, ReportStatus};
pub use report_attachment::{FileType, ReportAttachment, ReportWithAttachments};
