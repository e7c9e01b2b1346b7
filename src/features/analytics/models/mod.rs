mod account_age;
mod report_fact;

pub use account_age::AccountAgeSegment;
pub use report_fact::{
    CategoryCount, FactSource, HotSummary, MonthlyCategoryCount, ReportFact, StatusCount,
};
