//! Stable facade for the pagination engine used by command handlers.

mod accumulator;
mod components;
pub mod controller;
pub mod navigator;
mod page;
pub mod token;
pub mod view;

pub use accumulator::{Accumulator, ResultSet};
pub use components::{NavAction, NavControl, PagedView};
pub use controller::{FetchKind, FetchOutcome, FetchState, FetchTicket, PaginationController};
pub use navigator::{LocalPageNavigator, NavigatorEvent};
pub use page::{page_range, parse_page_number, resolve_items_per_page, total_pages};
pub use token::{CursorError, CursorToken, build_cursor, parse_cursor, validate_cursor};
pub use view::{
    FieldLookup, Header, LoadMoreAffordance, PlaceholderRow, TableRow, TableView,
    build_paged_table_view, build_table_view, empty_state_label, error_notice,
};
