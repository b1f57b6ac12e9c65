//! Page requests and page metadata.
//!
//! Pages are 1-indexed. A request past the last page is valid and yields an
//! empty result page; only `page < 1` or `page_size < 1` is rejected.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{DealError, Result};

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// A validated page request.
///
/// Deserialization runs the same validation as [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPageRequest")]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

/// Unvalidated wire form of a [`PageRequest`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPageRequest {
    page: i64,
    page_size: i64,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = DealError;

    fn try_from(raw: RawPageRequest) -> Result<Self> {
        validate(raw.page, raw.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Validate `page >= 1` and `page_size >= 1`.
    pub fn new(page: i64, page_size: i64) -> Result<Self> {
        validate(page, page_size)
    }

    /// First page of `page_size` records.
    pub fn first(page_size: i64) -> Result<Self> {
        validate(1, page_size)
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing or unparseable values take the defaults (page 1, 10 per
    /// page). Parsed values below 1 are rejected, as are page sizes above
    /// [`MAX_PAGE_SIZE`].
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = parse_or(page, DEFAULT_PAGE as i64);
        let page_size = parse_or(limit, DEFAULT_PAGE_SIZE as i64);
        if page_size > MAX_PAGE_SIZE as i64 {
            return Err(DealError::InvalidArgument(format!(
                "page size {page_size} exceeds the maximum of {MAX_PAGE_SIZE}"
            )));
        }
        validate(page, page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        compute_offset(self.page, self.page_size)
    }

    /// The following page with the same size.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            page_size: self.page_size,
        }
    }

    pub fn with_page_size(&self, page_size: usize) -> Result<Self> {
        validate(self.page as i64, page_size as i64)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// PageInfo
// ---------------------------------------------------------------------------

/// Pagination metadata returned alongside a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    pub total_count: usize,
    /// `ceil(total_count / page_size)`; zero only when `total_count` is zero.
    pub page_count: usize,
    pub offset: usize,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
}

impl PageInfo {
    /// Whether the requested page lies past the last page.
    pub fn is_past_end(&self) -> bool {
        self.offset >= self.total_count
    }
}

// ---------------------------------------------------------------------------
// Paginator operations
// ---------------------------------------------------------------------------

/// Reject `page < 1` and `page_size < 1` with
/// [`DealError::InvalidPageRequest`]. Values are never clamped.
pub fn validate(page: i64, page_size: i64) -> Result<PageRequest> {
    if page < 1 || page_size < 1 {
        return Err(DealError::InvalidPageRequest { page, page_size });
    }
    let invalid = || DealError::InvalidPageRequest { page, page_size };
    Ok(PageRequest {
        page: usize::try_from(page).map_err(|_| invalid())?,
        page_size: usize::try_from(page_size).map_err(|_| invalid())?,
    })
}

/// `(page - 1) * page_size`, saturating.
pub fn compute_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

pub fn build_page_info(request: PageRequest, total_count: usize) -> PageInfo {
    let page_count = total_count.div_ceil(request.page_size);
    let current_page = request.page;
    PageInfo {
        current_page,
        page_size: request.page_size,
        total_count,
        page_count,
        offset: request.offset(),
        previous_page: (current_page > 1).then(|| current_page - 1),
        next_page: (current_page < page_count).then(|| current_page + 1),
    }
}
