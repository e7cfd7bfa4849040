//! Fetched page values and their pagination metadata.

use std::fmt;

use crate::record::Record;

/// Opaque position token minted by a page source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Cursor bounds and neighbour flags reported alongside a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// True if at least one record exists before this page.
    pub has_previous_page: bool,
    /// True if at least one record exists after this page.
    pub has_next_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

impl PageInfo {
    /// Page info for a page with more records after `end_cursor`.
    pub fn with_next(end_cursor: impl Into<Cursor>) -> Self {
        Self {
            has_next_page: true,
            end_cursor: Some(end_cursor.into()),
            ..Self::default()
        }
    }

    /// Page info for the final page ending at `end_cursor`.
    pub fn last(end_cursor: impl Into<Cursor>) -> Self {
        Self {
            end_cursor: Some(end_cursor.into()),
            ..Self::default()
        }
    }
}

/// One fetched batch of records plus its pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T = Record> {
    pub records: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, page_info: PageInfo) -> Self {
        Self { records, page_info }
    }

    /// A page without records (e.g. an exhausted source).
    pub fn empty(page_info: PageInfo) -> Self {
        Self::new(Vec::new(), page_info)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
