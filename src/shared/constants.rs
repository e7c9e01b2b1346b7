/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Hard ceiling on a single attachment (50 MiB). Not configurable.
pub const MAX_ATTACHMENT_SIZE_BYTES: i64 = 52_428_800;

/// Most-recent hot reports included in a CSV export
pub const CSV_EXPORT_ROW_LIMIT: i64 = 10_000;

/// Prefix of generated report identifiers, e.g. `R-1A2B3C4D`
pub const REPORT_ID_PREFIX: &str = "R-";

/// Fresh identifiers tried when a generated report id is already taken
pub const REPORT_ID_ATTEMPTS: usize = 5;
