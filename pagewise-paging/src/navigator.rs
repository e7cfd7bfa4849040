//! Client-side page navigator over a fully known item count.

use std::fmt;
use std::ops::Range;

use pagewise_core::ConfigurationError;

use crate::page::{page_range, resolve_items_per_page, total_pages};

/// Change notification emitted to navigator subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorEvent {
    PageChanged(usize),
    ItemsPerPageChanged(usize),
}

type Listener = Box<dyn FnMut(NavigatorEvent) + Send>;

/// Fixed-size local paginator.
///
/// Shrinking the total below the current page snaps back to page 1, not to
/// the new last page.
pub struct LocalPageNavigator {
    total: usize,
    allowed_page_sizes: Vec<usize>,
    items_per_page: usize,
    current_page: usize,
    page_count: usize,
    listeners: Vec<Listener>,
}

impl fmt::Debug for LocalPageNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPageNavigator")
            .field("total", &self.total)
            .field("items_per_page", &self.items_per_page)
            .field("current_page", &self.current_page)
            .field("page_count", &self.page_count)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LocalPageNavigator {
    /// Create a navigator for `total` items.
    ///
    /// `limit` is used as items-per-page when it is one of
    /// `allowed_page_sizes`; otherwise the middle allowed size is used.
    pub fn new(
        total: usize,
        allowed_page_sizes: &[usize],
        limit: usize,
    ) -> Result<Self, ConfigurationError> {
        let items_per_page = resolve_items_per_page(allowed_page_sizes, limit)?;

        Ok(Self {
            total,
            allowed_page_sizes: allowed_page_sizes.to_vec(),
            items_per_page,
            current_page: 1,
            page_count: total_pages(total, items_per_page),
            listeners: Vec::new(),
        })
    }

    /// Register a listener. It immediately receives the current page and
    /// items-per-page, then every later change.
    pub fn subscribe(&mut self, mut listener: impl FnMut(NavigatorEvent) + Send + 'static) {
        listener(NavigatorEvent::PageChanged(self.current_page));
        listener(NavigatorEvent::ItemsPerPageChanged(self.items_per_page));
        self.listeners.push(Box::new(listener));
    }

    /// Apply an externally controlled page. `None` and `Some(0)` leave the
    /// current page alone; anything else overrides it (clamped to the range).
    pub fn set_external_page(&mut self, page: Option<usize>) {
        if let Some(page) = page.filter(|page| *page >= 1) {
            self.set_current_page(page.min(self.page_count));
        }
    }

    pub fn first(&mut self) -> bool {
        self.set_current_page(1)
    }

    /// Step back one page; no-op on page 1.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.set_current_page(self.current_page - 1)
    }

    /// Step forward one page; no-op on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.set_current_page(self.current_page + 1)
    }

    pub fn last(&mut self) -> bool {
        self.set_current_page(self.page_count)
    }

    /// Update the item count and recompute the page count.
    pub fn set_total(&mut self, total: usize) {
        if self.total == total {
            return;
        }
        self.total = total;
        self.recompute();
    }

    /// Switch to another allowed page size and recompute the page count.
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<(), ConfigurationError> {
        if items_per_page == 0 {
            return Err(ConfigurationError::NonPositivePageSize("items per page"));
        }
        if !self.allowed_page_sizes.contains(&items_per_page) {
            return Err(ConfigurationError::InvalidValue {
                key: "items per page".to_owned(),
                value: items_per_page.to_string(),
            });
        }
        if self.items_per_page == items_per_page {
            return Ok(());
        }

        self.items_per_page = items_per_page;
        self.emit(NavigatorEvent::ItemsPerPageChanged(items_per_page));
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.page_count = total_pages(self.total, self.items_per_page);
        if self.current_page > self.page_count {
            self.set_current_page(1);
        }
    }

    fn set_current_page(&mut self, page: usize) -> bool {
        if self.current_page == page {
            return false;
        }
        self.current_page = page;
        self.emit(NavigatorEvent::PageChanged(page));
        true
    }

    fn emit(&mut self, event: NavigatorEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn allowed_page_sizes(&self) -> &[usize] {
        &self.allowed_page_sizes
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Item indices of the current page.
    pub fn window(&self) -> Range<usize> {
        page_range(self.total, self.items_per_page, self.current_page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    const SIZES: [usize; 7] = [5, 10, 15, 20, 30, 50, 100];

    #[test]
    fn empty_total_has_one_page() {
        let mut nav = LocalPageNavigator::new(0, &SIZES, 5).unwrap();
        assert_eq!(nav.page_count(), 1);
        assert_eq!(nav.current_page(), 1);

        assert!(!nav.next());
        assert!(!nav.previous());
        nav.last();
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn shrinking_total_snaps_to_first_page() {
        let mut nav = LocalPageNavigator::new(23, &SIZES, 5).unwrap();
        assert_eq!(nav.page_count(), 5);

        nav.last();
        assert_eq!(nav.current_page(), 5);
        assert_eq!(nav.window(), 20..23);

        nav.set_total(8);
        assert_eq!(nav.page_count(), 2);
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn shrinking_total_keeps_page_that_still_exists() {
        let mut nav = LocalPageNavigator::new(23, &SIZES, 5).unwrap();
        nav.next();
        nav.set_total(8);
        assert_eq!(nav.current_page(), 2);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let mut nav = LocalPageNavigator::new(12, &SIZES, 5).unwrap();
        assert!(!nav.previous());
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert_eq!(nav.current_page(), 3);
        assert!(nav.first());
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn external_page_overrides_current_page() {
        let mut nav = LocalPageNavigator::new(40, &SIZES, 5).unwrap();
        nav.set_external_page(Some(4));
        assert_eq!(nav.current_page(), 4);

        nav.set_external_page(None);
        nav.set_external_page(Some(0));
        assert_eq!(nav.current_page(), 4);

        nav.set_external_page(Some(99));
        assert_eq!(nav.current_page(), 8);
    }

    #[test]
    fn unknown_limit_uses_middle_size() {
        let nav = LocalPageNavigator::new(100, &SIZES, 7).unwrap();
        assert_eq!(nav.items_per_page(), 20);
    }

    #[test]
    fn empty_allowed_sizes_fail_fast() {
        let err = LocalPageNavigator::new(10, &[], 5).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyPageSizes);
    }

    #[test]
    fn subscribers_see_mount_and_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut nav = LocalPageNavigator::new(23, &SIZES, 5).unwrap();
        nav.subscribe(move |event| sink.lock().unwrap().push(event));
        nav.next();
        nav.next();
        nav.set_items_per_page(15).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                NavigatorEvent::PageChanged(1),
                NavigatorEvent::ItemsPerPageChanged(5),
                NavigatorEvent::PageChanged(2),
                NavigatorEvent::PageChanged(3),
                NavigatorEvent::ItemsPerPageChanged(15),
                NavigatorEvent::PageChanged(1),
            ]
        );
        assert_eq!(nav.page_count(), 2);
    }

    #[test]
    fn disallowed_page_size_is_rejected() {
        let mut nav = LocalPageNavigator::new(23, &SIZES, 5).unwrap();
        assert!(nav.set_items_per_page(7).is_err());
        assert!(nav.set_items_per_page(0).is_err());
        assert_eq!(nav.items_per_page(), 5);
    }
}
