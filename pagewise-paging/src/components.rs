//! Navigation controls shared by both pagination strategies.

use crate::controller::PaginationController;
use crate::navigator::LocalPageNavigator;

/// A navigation action a renderer can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    First,
    Previous,
    Next,
    Last,
    LoadMore,
}

impl NavAction {
    /// Short button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "<<",
            Self::Previous => "<",
            Self::Next => ">",
            Self::Last => ">>",
            Self::LoadMore => "Load More",
        }
    }

    /// Command word that triggers this action.
    pub fn command(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Previous => "prev",
            Self::Next => "next",
            Self::Last => "last",
            Self::LoadMore => "more",
        }
    }
}

/// One navigation button and its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControl {
    pub action: NavAction,
    pub enabled: bool,
    pub busy: bool,
}

impl NavControl {
    fn new(action: NavAction, enabled: bool) -> Self {
        Self {
            action,
            enabled,
            busy: false,
        }
    }
}

/// Common surface of the two pagination strategies.
///
/// Cursor-based load-more and local fixed-size pages are independent
/// implementations; a renderer only needs this trait to draw their controls.
pub trait PagedView {
    /// Buttons to offer, in display order.
    fn controls(&self) -> Vec<NavControl>;

    /// Short status line (e.g. `Page 2/5`).
    fn footer_label(&self) -> String;
}

impl<T> PagedView for PaginationController<T> {
    fn controls(&self) -> Vec<NavControl> {
        vec![NavControl {
            action: NavAction::LoadMore,
            enabled: self.can_load_more(),
            busy: self.is_loading(),
        }]
    }

    fn footer_label(&self) -> String {
        let loaded = self.records().len();

        if self.is_loading() {
            format!("{loaded} loaded • loading")
        } else if self.page_info().has_next_page {
            format!("{loaded} loaded • more available")
        } else {
            format!("{loaded} loaded")
        }
    }
}

impl PagedView for LocalPageNavigator {
    fn controls(&self) -> Vec<NavControl> {
        vec![
            NavControl::new(NavAction::First, self.has_previous()),
            NavControl::new(NavAction::Previous, self.has_previous()),
            NavControl::new(NavAction::Next, self.has_next()),
            NavControl::new(NavAction::Last, self.has_next()),
        ]
    }

    fn footer_label(&self) -> String {
        format!("Page {}/{}", self.current_page(), self.page_count())
    }
}
