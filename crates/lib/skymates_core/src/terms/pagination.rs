//! Keyset pagination helpers for category listings.
//!
//! Pages are ordered by term id, newest first. The cursor is the id of the
//! last term the client has seen and is an exclusive bound, so terms added
//! while a client is paging (always with larger ids) never shift later
//! pages. Deleting a not-yet-seen term ahead of the cursor simply removes it
//! from the remaining pages.

use crate::models::term::{TermPage, TermSummary};

/// Page size used when the request omits it or asks for an unusable value.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size honored as given.
pub const MAX_PAGE_SIZE: usize = 50;

/// Normalize a requested page size.
///
/// Absent, non-positive and oversized requests all fall back to
/// [`DEFAULT_PAGE_SIZE`].
pub fn clamp_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n > 0 && n <= MAX_PAGE_SIZE as i64 => n as usize,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Number of rows to request from the store for a page of `limit`.
///
/// One extra row tells whether anything lies beyond the page.
pub fn fetch_size(limit: usize) -> usize {
    limit + 1
}

/// Turn an over-fetched row set into a page.
pub fn into_page(mut rows: Vec<TermSummary>, limit: usize) -> TermPage {
    let has_more = rows.len() > limit;
    rows.truncate(limit);
    TermPage {
        terms: rows,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_limits_use_default() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(-5)), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(999)), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn in_range_limits_are_honored() {
        assert_eq!(clamp_limit(Some(5)), 5);
        assert_eq!(clamp_limit(Some(1)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(51)), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn extra_row_sets_has_more() {
        let rows = (1..=4).rev().map(|i| TermSummary::new(i, "t")).collect();
        let page = into_page(rows, 3);
        assert!(page.has_more);
        assert_eq!(page.terms.len(), 3);
        assert_eq!(page.next_cursor(), Some(2));
    }

    #[test]
    fn short_fetch_is_last_page() {
        let rows = vec![TermSummary::new(2, "b"), TermSummary::new(1, "a")];
        let page = into_page(rows, 3);
        assert!(!page.has_more);
        assert_eq!(page.terms.len(), 2);
    }

    #[test]
    fn empty_page_has_no_cursor() {
        let page = into_page(Vec::new(), 10);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor(), None);
    }
}
