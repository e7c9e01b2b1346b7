mod analytics_repository;
#[cfg(test)]
mod memory;

pub use analytics_repository::{AnalyticsRepository, PgAnalyticsRepository};
#[cfg(test)]
pub use memory::InMemoryAnalyticsRepository;
