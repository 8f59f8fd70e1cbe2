//! Pagination query parameters and response metadata.

use axum::extract::rejection::QueryRejection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Resolves the requested page against the configured default size.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: `default_page_size`
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and [`MAX_PAGE_SIZE`]
    pub fn resolve(&self, default_page_size: u32) -> Result<PageRequest, String> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(default_page_size);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        Ok(PageRequest { page, page_size })
    }
}

/// Reports unparseable `page` / `page_size` values as a validation error.
pub fn pagination_rejection(rejection: QueryRejection) -> AppError {
    AppError::validation(
        "Invalid pagination parameters",
        json!({ "query": [rejection.body_text()] }),
    )
}

/// A validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// `(offset, limit)` tuple for SQL queries.
    pub fn offset_limit(&self) -> (i64, i64) {
        let offset = (self.page as i64 - 1) * self.page_size as i64;
        (offset, self.page_size as i64)
    }

    pub fn meta(&self, total_items: i64) -> PaginationMeta {
        let total_pages = if total_items <= 0 {
            0
        } else {
            ((total_items + self.page_size as i64 - 1) / self.page_size as i64) as u32
        };

        PaginationMeta {
            page: self.page,
            page_size: self.page_size,
            total_items,
            total_pages,
        }
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub pagination: PaginationMeta,
    pub items: Vec<T>,
}
