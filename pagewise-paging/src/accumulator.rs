//! Append-only result set built from successive pages.

use pagewise_core::{Page, PageInfo, Record};

/// Records seen so far plus the page info of the latest fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<T = Record> {
    /// Arrival order; never reordered or de-duplicated.
    pub records: Vec<T>,
    /// Replaced wholesale by every merged page.
    pub page_info: PageInfo,
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

/// Owns the merged result set of one browse session.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator<T = Record> {
    result: ResultSet<T>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Self {
            result: ResultSet::default(),
        }
    }
}

impl<T> Accumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record and clear the page info.
    ///
    /// Rows rendered from the previous state are invalid afterwards.
    pub fn reset(&mut self) {
        self.result.records.clear();
        self.result.page_info = PageInfo::default();
    }

    /// Append `incoming` and adopt its page info.
    ///
    /// An empty page leaves everything untouched, so a terminal empty fetch
    /// can never shrink the records or overwrite valid page info.
    pub fn merge(&mut self, incoming: Page<T>) -> &ResultSet<T> {
        if incoming.records.is_empty() {
            return &self.result;
        }

        self.result.records.extend(incoming.records);
        self.result.page_info = incoming.page_info;
        &self.result
    }

    pub fn result(&self) -> &ResultSet<T> {
        &self.result
    }

    pub fn records(&self) -> &[T] {
        &self.result.records
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.result.page_info
    }

    pub fn len(&self) -> usize {
        self.result.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.records.is_empty()
    }
}
