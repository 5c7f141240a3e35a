//! Paginated table fetch
//!
//! The server caps each response at `limit` rows and reports the total
//! number of matching rows in `_meta.count`. [`fetch_all_pages`] walks the
//! page windows in order until that total is covered.

use crate::error::{IpfError, Result};
use crate::types::{Page, Pagination, Row, TableRequest};

/// Largest page size the server accepts
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Page size used by single-page fetches when the caller gives none
pub const DEFAULT_FETCH_LIMIT: usize = 1_000;

/// Reject page sizes the server would not honour
///
/// # Errors
///
/// [`IpfError::InvalidArgument`] unless `1 <= limit <= MAX_PAGE_SIZE`
pub fn check_page_size(limit: usize) -> Result<()> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(IpfError::InvalidArgument(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, limit
        ))
        .into());
    }
    Ok(())
}

/// Anything that can answer one table page request
///
/// Implemented by the HTTP session; tests substitute an in-memory table.
pub trait PageSource {
    /// Issue one query for `endpoint` and return the decoded page
    ///
    /// Implementations must fail on any non-success response.
    fn fetch_page(&self, endpoint: &str, request: &TableRequest) -> Result<Page>;
}

/// Fetch every row of a table query, page by page
///
/// Pages are requested sequentially with `pagination = {start, limit}`
/// starting at zero. Rows are concatenated in server order without
/// deduplication. The loop stops once `start + limit >= count`, where
/// `count` is the total reported by the most recent page.
///
/// Any page error aborts the whole fetch; rows gathered so far are dropped.
///
/// # Errors
///
/// - [`IpfError::InvalidArgument`] if `limit` is zero or above [`MAX_PAGE_SIZE`]
/// - whatever the [`PageSource`] returns for a failed page
pub fn fetch_all_pages<S: PageSource + ?Sized>(
    source: &S,
    endpoint: &str,
    mut request: TableRequest,
    limit: usize,
) -> Result<Vec<Row>> {
    check_page_size(limit)?;

    let mut rows: Vec<Row> = Vec::new();
    let mut start = 0usize;

    loop {
        request.pagination = Some(Pagination { start, limit });
        let page = source.fetch_page(endpoint, &request)?;
        let total = page.meta.count;

        tracing::debug!(
            "Fetched page of {} rows from {} (start={}, limit={}, total={})",
            page.data.len(),
            endpoint,
            start,
            limit,
            total
        );

        rows.extend(page.data);

        match start.checked_add(limit) {
            Some(next) if next < total => start = next,
            _ => break,
        }
    }

    Ok(rows)
}
