//! Offset pagination shared by every list endpoint.

use serde::Serialize;

/// Largest page size any list endpoint will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a 1-based page number. Missing or non-positive values become 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.filter(|p| *p >= 1).unwrap_or(1)
}

/// Clamp a page size into `1..=MAX_PAGE_SIZE`, using `default` when absent.
pub fn clamp_size(size: Option<i64>, default: i64) -> i64 {
    size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Row offset for a clamped page/size pair.
pub fn offset_for(page: i64, size: i64) -> i64 {
    (page - 1).saturating_mul(size)
}

/// One page of results plus the total count before pagination.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub total_count: i64,
    pub page: i64,
    pub size: i64,
    pub items: Vec<T>,
}
