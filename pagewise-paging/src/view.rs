//! Table view composition for paginated record sets.
//!
//! Renderers receive a [`TableView`] and never look at the controller or
//! navigator directly.

use pagewise_core::{FetchFailure, Record};

use crate::controller::PaginationController;
use crate::navigator::LocalPageNavigator;

/// Skeleton width used when a header has no width hint.
const DEFAULT_SKELETON_WIDTH: usize = 8;

/// Display lookup for anything shown as a table row.
pub trait FieldLookup {
    /// Display value of `key`; missing fields render as an empty string.
    fn display(&self, key: &str) -> String;
}

impl FieldLookup for Record {
    fn display(&self, key: &str) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }
}

/// Column definition: record key, visible label and skeleton width hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub label: String,
    pub width_hint: Option<usize>,
}

impl Header {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width_hint: None,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width_hint = Some(width);
        self
    }

    fn skeleton_width(&self) -> usize {
        self.width_hint.unwrap_or(DEFAULT_SKELETON_WIDTH)
    }
}

/// One rendered record: its index in the result set and header-ordered cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub index: usize,
    pub cells: Vec<(String, String)>,
}

/// Skeleton row shown while loading; one width per header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRow {
    pub widths: Vec<usize>,
}

/// State of the "load more" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMoreAffordance {
    pub enabled: bool,
    pub busy: bool,
}

/// Everything a renderer needs to draw one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<Header>,
    pub rows: Vec<TableRow>,
    pub placeholder_rows: Vec<PlaceholderRow>,
    /// Present when there are no rows and nothing is loading.
    pub empty_state_label: Option<String>,
    /// Inline notice for the most recent fetch failure.
    pub error_notice: Option<String>,
    /// Present for load-more tables only.
    pub load_more: Option<LoadMoreAffordance>,
}

impl TableView {
    /// Result-set index of the `row`th visible row, counting from 1.
    pub fn record_index(&self, row: usize) -> Option<usize> {
        let position = row.checked_sub(1)?;
        self.rows.get(position).map(|visible| visible.index)
    }
}

/// "No pins found"-style label for an empty table.
pub fn empty_state_label(label: &str) -> String {
    format!("No {} found", label.to_lowercase())
}

/// Inline error notice: message followed by the optional detail.
pub fn error_notice(failure: &FetchFailure) -> String {
    match failure.detail.as_deref() {
        Some(detail) if !detail.is_empty() => format!("Error: {} {}", failure.message, detail),
        _ => format!("Error: {}", failure.message),
    }
}

/// Build the view of a load-more table.
///
/// Rows loaded before a failed "load more" stay visible next to the notice.
pub fn build_table_view<T>(
    label: &str,
    headers: &[Header],
    controller: &PaginationController<T>,
) -> TableView
where
    T: FieldLookup,
{
    let rows = build_rows(headers, controller.records(), 0);
    let placeholder_rows = build_placeholders(headers, controller.loading_placeholder_count());
    let empty = rows.is_empty() && !controller.is_loading();

    TableView {
        headers: headers.to_vec(),
        rows,
        placeholder_rows,
        empty_state_label: empty.then(|| empty_state_label(label)),
        error_notice: controller.error().map(error_notice),
        load_more: Some(LoadMoreAffordance {
            enabled: controller.can_load_more(),
            busy: controller.is_loading(),
        }),
    }
}

/// Build the view of the navigator's current page over `items`.
pub fn build_paged_table_view<T>(
    label: &str,
    headers: &[Header],
    items: &[T],
    navigator: &LocalPageNavigator,
) -> TableView
where
    T: FieldLookup,
{
    let window = navigator.window();
    let end = window.end.min(items.len());
    let start = window.start.min(end);
    let rows = build_rows(headers, &items[start..end], start);

    TableView {
        headers: headers.to_vec(),
        empty_state_label: rows.is_empty().then(|| empty_state_label(label)),
        rows,
        placeholder_rows: Vec::new(),
        error_notice: None,
        load_more: None,
    }
}

fn build_rows<T: FieldLookup>(headers: &[Header], items: &[T], offset: usize) -> Vec<TableRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| TableRow {
            index: offset + i,
            cells: headers
                .iter()
                .map(|header| (header.key.clone(), item.display(&header.key)))
                .collect(),
        })
        .collect()
}

fn build_placeholders(headers: &[Header], count: usize) -> Vec<PlaceholderRow> {
    let widths: Vec<usize> = headers.iter().map(Header::skeleton_width).collect();
    vec![PlaceholderRow { widths }; count]
}
