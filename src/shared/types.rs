use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset/limit pagination summary.
///
/// `page` is 1-indexed and derived from `skip / limit`; `total_pages` is
/// `ceil(total / limit)`. A zero limit yields zero pages instead of dividing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn from_offset(skip: i64, limit: i64, total: i64) -> Self {
        if limit <= 0 {
            return Self {
                page: 1,
                page_size: 0,
                total_pages: 0,
            };
        }

        Self {
            page: skip.max(0) / limit + 1,
            page_size: limit,
            total_pages: (total.max(0) + limit - 1) / limit,
        }
    }
}
