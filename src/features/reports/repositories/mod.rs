#[cfg(test)]
mod memory;
mod report_repository;

#[cfg(test)]
pub use memory::InMemoryReportRepository;
pub use report_repository::{InsertOutcome, PgReportRepository, ReportRepository};
