//! Pagination utilities for offered-course listings

use serde::Serialize;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a caller may request
pub const MAX_LIMIT: i64 = 100;

/// Sanitized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Rows per page
    pub limit: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Calculate pagination from the requested page and limit
///
/// Missing or non-positive values fall back to page 1 and [`DEFAULT_LIMIT`];
/// the limit is capped at [`MAX_LIMIT`]. The offset saturates instead of
/// overflowing, so an absurd page number yields an empty page.
///
/// # Examples
/// ```
/// use campus_offering::pagination::calculate_pagination;
///
/// let p = calculate_pagination(Some(3), Some(20));
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 40);
///
/// let p = calculate_pagination(None, Some(10_000));
/// assert_eq!(p.limit, 100);
/// ```
pub fn calculate_pagination(requested_page: Option<i64>, requested_limit: Option<i64>) -> Pagination {
    let page = requested_page.filter(|p| *p >= 1).unwrap_or(1);
    let limit = requested_limit
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);

    Pagination {
        page,
        limit,
        offset: (page - 1).saturating_mul(limit),
    }
}

/// Listing metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_page: i64,
}

impl PageMeta {
    pub fn new(pagination: &Pagination, total: i64) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_page: (total + pagination.limit - 1) / pagination.limit,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}
