//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Rows to skip for this page (pages are 1-based)
    pub fn offset(&self) -> i64 {
        (self.page.max(1) as i64 - 1) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Metadata describing this page of a `total_items`-row result
    pub fn meta(&self, total_items: u64) -> PaginationMeta {
        let per_page = self.per_page.max(1);
        PaginationMeta {
            page: self.page.max(1),
            per_page,
            total_items,
            total_pages: total_items.div_ceil(per_page as u64) as u32,
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    /// Widest range accepted by report and history queries
    pub fn unbounded() -> Self {
        Self {
            start: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2100, 12, 31).unwrap(),
        }
    }

    /// Clamp optional filter bounds onto the unbounded range
    pub fn from_bounds(
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> Self {
        let unbounded = Self::unbounded();
        Self {
            start: start.unwrap_or(unbounded.start),
            end: end.unwrap_or(unbounded.end),
        }
    }
}
