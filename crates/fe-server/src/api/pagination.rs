//! Pagination parameters and metadata for list responses

use serde::Serialize;

pub const PAGE_LENGTH_DEFAULT: i64 = 10;
pub const PAGE_LENGTH_MAX: i64 = 100;
pub const PAGE_NO_DEFAULT: i64 = 1;

/// Resolved paging window for one list request.
///
/// Out-of-range requests degrade to the defaults; the page length is
/// capped so a single request cannot drag the whole table.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page_no: i64,
    pub page_length: i64,
}

impl Page {
    pub fn from_params(page: Option<i64>, page_length: Option<i64>) -> Self {
        let page_no = match page {
            Some(n) if n > 0 => n,
            _ => PAGE_NO_DEFAULT,
        };
        let page_length = match page_length {
            Some(n) if n > 0 => n.min(PAGE_LENGTH_MAX),
            _ => PAGE_LENGTH_DEFAULT,
        };
        Page {
            page_no,
            page_length,
        }
    }

    pub fn offset(&self) -> i64 {
        self.page_length * (self.page_no - 1)
    }

    /// Finalize the page metadata once the result count is known.
    pub fn into_meta(self, total_results: i64) -> PageMeta {
        let mut total_pages = total_results / self.page_length;
        if total_results % self.page_length != 0 {
            total_pages += 1;
        }
        PageMeta {
            page: self.page_no,
            page_length: self.page_length,
            total_results,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub page_length: i64,
    pub total_results: i64,
    pub total_pages: i64,
}
