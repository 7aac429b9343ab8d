//! Paginator
//!
//! Slices an ordered row set into fixed-size pages. The stored page number
//! may drift out of range when filtering shrinks the set; slicing always
//! clamps it for display without touching the stored state.

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];

/// Default page size for a freshly mounted view.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Total number of pages for a row count; always at least 1.
///
/// `page_size` must be nonzero; [`ViewState`](crate::state::ViewState) only
/// hands out sizes from [`PAGE_SIZES`].
pub fn total_pages(len: usize, page_size: usize) -> usize {
    debug_assert_ne!(page_size, 0, "page size must be nonzero");
    len.div_ceil(page_size).max(1)
}

/// Clamps a requested page into `[1, total]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total)
}

/// Slices one page out of the full row set.
///
/// Returns the page slice, the effective (clamped) page number, and the total
/// page count. `page_size` must be nonzero.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> (&[T], usize, usize) {
    let total = total_pages(rows.len(), page_size);
    let effective = clamp_page(page, total);
    let start = (effective - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    (&rows[start..end], effective, total)
}
