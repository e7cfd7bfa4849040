//! One interactive browse session over the context's record source.
//!
//! Fetches run on spawned tasks and report back through an unbounded channel;
//! the input loop feeds each [`FetchCompletion`] into
//! [`BrowseSession::on_completion`]. Responses that belong to a superseded
//! session are dropped by the controller.

use std::sync::Arc;

use pagewise_core::{
    BrowseMode, ConfigurationError, Context, FetchFailure, Page, QueryParams, Record, Settings,
};
use pagewise_paging::{
    FetchOutcome, FetchTicket, Header, LocalPageNavigator, PagedView, PaginationController,
    TableView, build_paged_table_view, build_table_view, error_notice,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::render::render_table;

/// A finished fetch on its way back to the session.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Page, FetchFailure>,
}

pub type CompletionSender = mpsc::UnboundedSender<FetchCompletion>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<FetchCompletion>;

pub fn completion_channel() -> (CompletionSender, CompletionReceiver) {
    mpsc::unbounded_channel()
}

/// Table label used in titles and the empty state.
pub const PIN_LABEL: &str = "Pins";

/// Columns of the pin library table.
pub fn pin_headers() -> Vec<Header> {
    vec![
        Header::new("barcode", "Barcode").with_width(10),
        Header::new("loopSize", "Loop Size").with_width(4),
        Header::new("status", "Status").with_width(8),
    ]
}

pub struct BrowseSession {
    ctx: Context,
    controller: PaginationController,
    /// Present in paged mode, over the fully drained result set.
    navigator: Option<LocalPageNavigator>,
    headers: Vec<Header>,
    label: String,
    completions: CompletionSender,
}

impl BrowseSession {
    /// Build the session and spawn the first page fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        ctx: Context,
        headers: Vec<Header>,
        label: impl Into<String>,
        completions: CompletionSender,
    ) -> Result<Self, ConfigurationError> {
        let settings = Arc::clone(&ctx.settings);
        let (controller, ticket) = PaginationController::new(
            settings.page_size,
            settings.placeholder_rows,
            QueryParams::default(),
        )?;
        let navigator = navigator_for(&settings)?;

        info!(mode = ?settings.mode, page_size = settings.page_size, "browse session started");

        let session = Self {
            ctx,
            controller,
            navigator,
            headers,
            label: label.into(),
            completions,
        };
        session.spawn_fetch(ticket);

        Ok(session)
    }

    /// Run `ticket` on its own task; the result comes back through the channel.
    pub fn spawn_fetch(&self, ticket: FetchTicket) {
        let source = Arc::clone(&self.ctx.source);
        let completions = self.completions.clone();

        tokio::spawn(async move {
            let result = source.fetch(ticket.request.clone()).await;
            if completions.send(FetchCompletion { ticket, result }).is_err() {
                debug!("browse session closed before fetch completed");
            }
        });
    }

    /// Merge a finished fetch. Returns the text to show, if any.
    ///
    /// In paged mode the session keeps loading until the source is exhausted
    /// or a fetch fails, and only then hands the loaded total to the navigator.
    pub fn on_completion(&mut self, completion: FetchCompletion) -> Option<String> {
        let FetchCompletion { ticket, result } = completion;

        match self.controller.complete(&ticket, result) {
            FetchOutcome::Stale => return None,
            FetchOutcome::Merged { added } if self.navigator.is_some() => {
                // An empty page keeps the previous page info; stop there.
                if added > 0
                    && let Some(next) = self.controller.begin_load_more()
                {
                    self.spawn_fetch(next);
                    return None;
                }
            }
            FetchOutcome::Merged { .. } | FetchOutcome::Failed(_) => {}
        }

        // Rows merged before a failure stay pageable next to the notice.
        let total = self.controller.records().len();
        if let Some(navigator) = self.navigator.as_mut() {
            navigator.set_total(total);
        }
        Some(self.render())
    }

    /// Render the current table, its controls and footer as plain text.
    pub fn render(&self) -> String {
        let view = self.table_view();
        match &self.navigator {
            Some(navigator) => {
                let mut footer = navigator.footer_label();
                if self.controller.is_loading() {
                    footer.push_str(" • loading");
                }
                render_table(&self.label, &view, &navigator.controls(), &footer)
            }
            None => {
                let controls = self.controller.controls();
                render_table(&self.label, &view, &controls, &self.controller.footer_label())
            }
        }
    }

    /// The table as currently shown: the navigator's page in paged mode,
    /// every accumulated record otherwise.
    pub fn table_view(&self) -> TableView {
        let Some(navigator) = &self.navigator else {
            return build_table_view(&self.label, &self.headers, &self.controller);
        };

        let mut view = build_paged_table_view(
            &self.label,
            &self.headers,
            self.controller.records(),
            navigator,
        );
        view.error_notice = self.controller.error().map(error_notice);
        if self.controller.is_loading() {
            view.empty_state_label = None;
        }
        view
    }

    /// Record behind the `row`th visible row (one-based), with its
    /// result-set index.
    pub fn visible_record(&self, row: usize) -> Option<(usize, &Record)> {
        let index = self.table_view().record_index(row)?;
        self.controller.records().get(index).map(|record| (index, record))
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut PaginationController {
        &mut self.controller
    }

    pub fn navigator(&self) -> Option<&LocalPageNavigator> {
        self.navigator.as_ref()
    }

    pub(crate) fn navigator_mut(&mut self) -> Option<&mut LocalPageNavigator> {
        self.navigator.as_mut()
    }

    pub fn mode(&self) -> BrowseMode {
        self.ctx.settings.mode
    }
}

fn navigator_for(settings: &Settings) -> Result<Option<LocalPageNavigator>, ConfigurationError> {
    match settings.mode {
        BrowseMode::LoadMore => Ok(None),
        BrowseMode::Paged => Ok(Some(LocalPageNavigator::new(
            0,
            &settings.page_sizes,
            settings.limit,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use pagewise_core::PageInfo;
    use pagewise_database::{MemoryPageSource, seed_library_pins};

    use super::*;

    fn context(mode: BrowseMode) -> Context {
        let source = MemoryPageSource::new("pin_library", "barcode", seed_library_pins());
        let settings = Settings {
            mode,
            ..Settings::default()
        };
        Context::new(Arc::new(source), settings)
    }

    #[tokio::test]
    async fn load_more_mode_renders_first_page() {
        let (tx, mut rx) = completion_channel();
        let mut session =
            BrowseSession::start(context(BrowseMode::LoadMore), pin_headers(), PIN_LABEL, tx)
                .unwrap();
        assert!(session.controller().is_loading());

        let completion = rx.recv().await.unwrap();
        let text = session.on_completion(completion).unwrap();

        assert_eq!(session.controller().records().len(), 2);
        assert!(text.contains("DLSL-0001"));
        assert!(text.contains("[Load More]"));
        assert!(text.contains("2 loaded • more available"));
    }

    #[tokio::test]
    async fn paged_mode_drains_before_rendering() {
        let (tx, mut rx) = completion_channel();
        let mut session =
            BrowseSession::start(context(BrowseMode::Paged), pin_headers(), PIN_LABEL, tx)
                .unwrap();

        let text = loop {
            let completion = rx.recv().await.unwrap();
            if let Some(text) = session.on_completion(completion) {
                break text;
            }
        };

        assert_eq!(session.controller().records().len(), 23);
        assert_eq!(session.navigator().map(|nav| nav.page_count()), Some(5));
        assert!(text.contains("Page 1/5"));
    }

    #[tokio::test]
    async fn superseded_completion_is_ignored() {
        let (tx, mut rx) = completion_channel();
        let mut session =
            BrowseSession::start(context(BrowseMode::LoadMore), pin_headers(), PIN_LABEL, tx)
                .unwrap();
        let first = rx.recv().await.unwrap();

        let refreshed = session.controller_mut().begin_reload();
        assert_eq!(session.on_completion(first), None);

        let late = FetchCompletion {
            ticket: refreshed,
            result: Ok(Page::empty(PageInfo::default())),
        };
        assert!(session.on_completion(late).is_some());
        assert!(session.controller().records().is_empty());
    }
}
