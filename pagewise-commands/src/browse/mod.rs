pub mod filter;
pub mod more;
pub mod navigate;
pub mod refresh;
pub mod select;
pub mod show;
pub mod size;

/// Reply for navigator commands issued in load-more mode.
pub(crate) const PAGED_ONLY: &str = "Page navigation is only available in paged mode.";
