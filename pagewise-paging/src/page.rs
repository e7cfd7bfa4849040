//! Pure pagination math and page-window shaping helpers.

use std::num::NonZeroUsize;
use std::ops::Range;

use pagewise_core::ConfigurationError;

/// Compute the number of pages for a paginated list. Never less than one.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

/// Item indices covered by one-based `page`, bounded by `total_items`.
///
/// Pages past the end yield an empty range at `total_items`.
pub fn page_range(total_items: usize, per_page: usize, page: usize) -> Range<usize> {
    let skipped = page.saturating_sub(1).saturating_mul(per_page.max(1));
    let start = skipped.min(total_items);
    start..skipped.saturating_add(per_page.max(1)).min(total_items)
}

/// Parse a typed page number. Zero, negatives and non-numbers are rejected.
pub fn parse_page_number(raw: &str) -> Option<usize> {
    raw.trim().parse::<NonZeroUsize>().ok().map(NonZeroUsize::get)
}

/// Pick the effective items-per-page from an allowed set.
///
/// `limit` wins when it is allowed; otherwise the element at index `len / 2`
/// of the sorted set.
pub fn resolve_items_per_page(
    allowed: &[usize],
    limit: usize,
) -> Result<usize, ConfigurationError> {
    if allowed.is_empty() {
        return Err(ConfigurationError::EmptyPageSizes);
    }
    if allowed.contains(&0) {
        return Err(ConfigurationError::NonPositivePageSize("allowed page sizes"));
    }

    if allowed.contains(&limit) {
        return Ok(limit);
    }

    let mut sorted = allowed.to_vec();
    sorted.sort_unstable();
    Ok(sorted[sorted.len() / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(23, 5), 5);
        assert_eq!(total_pages(25, 5), 5);
        assert_eq!(total_pages(8, 5), 2);
    }

    #[test]
    fn range_is_bounded_by_total() {
        assert_eq!(page_range(23, 5, 1), 0..5);
        assert_eq!(page_range(23, 5, 5), 20..23);
        assert_eq!(page_range(23, 5, 9), 23..23);
        assert_eq!(page_range(0, 5, 1), 0..0);
    }

    #[test]
    fn page_numbers_start_at_one() {
        assert_eq!(parse_page_number(" 3 "), Some(3));
        assert_eq!(parse_page_number("0"), None);
        assert_eq!(parse_page_number("-2"), None);
        assert_eq!(parse_page_number("x"), None);
    }

    #[test]
    fn allowed_limit_is_kept() {
        assert_eq!(resolve_items_per_page(&[5, 10, 15, 20, 30, 50, 100], 5), Ok(5));
    }

    #[test]
    fn unknown_limit_falls_back_to_middle() {
        assert_eq!(resolve_items_per_page(&[5, 10, 15, 20, 30, 50, 100], 7), Ok(20));
        assert_eq!(resolve_items_per_page(&[100, 5, 50, 10], 7), Ok(50));
        assert_eq!(resolve_items_per_page(&[10, 5], 7), Ok(10));
    }

    #[test]
    fn bad_allowed_sets_fail_fast() {
        assert_eq!(resolve_items_per_page(&[], 5), Err(ConfigurationError::EmptyPageSizes));
        assert!(resolve_items_per_page(&[0, 5], 5).is_err());
    }
}
