//! Load-more controller: one browse session over a cursor-paged source.
//!
//! The controller never awaits anything itself. Each fetch is described by a
//! [`FetchTicket`]; the caller runs the request against its source (inline or
//! on another task) and hands the result back through
//! [`PaginationController::complete`]. Tickets are matched against the single
//! fetch the controller is waiting for, so responses that arrive after a reset
//! are dropped instead of being merged into the new session.

use pagewise_core::{
    ConfigurationError, FetchFailure, Page, PageInfo, PageRequest, PageSource, QueryParams, Record,
};
use tracing::{debug, info, warn};

use crate::accumulator::{Accumulator, ResultSet};

/// Controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
    /// The last fetch failed; records loaded before it are intact.
    Error(FetchFailure),
}

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a session.
    Initial,
    /// Continuation after the current end cursor.
    More,
}

/// Describes one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Browse session the fetch belongs to; bumped by every reset.
    pub session: u64,
    /// Unique per controller.
    pub id: u64,
    pub kind: FetchKind,
    pub request: PageRequest,
}

/// Result of handing a response back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged; `added` may be zero for an empty page.
    Merged { added: usize },
    /// The fetch failed and the controller entered its error state.
    Failed(FetchFailure),
    /// The response no longer matches the outstanding fetch and was dropped.
    Stale,
}

/// Orchestrates initial load, load-more and resets for one result set.
#[derive(Debug)]
pub struct PaginationController<T = Record> {
    accumulator: Accumulator<T>,
    state: FetchState,
    query: QueryParams,
    page_size: usize,
    placeholder_rows: usize,
    session: u64,
    next_id: u64,
    in_flight: Option<u64>,
}

impl<T> PaginationController<T> {
    /// Create a controller and the ticket for its first page.
    ///
    /// The controller starts out `Fetching`; run the returned ticket to load
    /// the first page.
    pub fn new(
        page_size: usize,
        placeholder_rows: usize,
        query: QueryParams,
    ) -> Result<(Self, FetchTicket), ConfigurationError> {
        if page_size == 0 {
            return Err(ConfigurationError::NonPositivePageSize("page size"));
        }

        let mut controller = Self {
            accumulator: Accumulator::new(),
            state: FetchState::Idle,
            query,
            page_size,
            placeholder_rows,
            session: 0,
            next_id: 0,
            in_flight: None,
        };
        let ticket = controller.issue(FetchKind::Initial);

        Ok((controller, ticket))
    }

    /// Request the page after the current end cursor.
    ///
    /// Returns `None` (and issues nothing) while a fetch is in flight or when
    /// the latest page info reports no next page.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.is_loading() {
            debug!(session = self.session, "load more ignored: fetch already in flight");
            return None;
        }

        if !self.page_info().has_next_page {
            debug!(session = self.session, "load more ignored: no next page");
            return None;
        }

        Some(self.issue(FetchKind::More))
    }

    /// Start a new session with `query`, discarding every loaded record.
    ///
    /// Always issues a first-page fetch. An outstanding fetch from the old
    /// session becomes stale.
    pub fn begin_refresh(&mut self, query: QueryParams) -> FetchTicket {
        self.accumulator.reset();
        self.session += 1;
        self.query = query;
        info!(session = self.session, query = %self.query, "browse session reset");

        self.issue(FetchKind::Initial)
    }

    /// Restart the current session with unchanged query parameters.
    pub fn begin_reload(&mut self) -> FetchTicket {
        let query = self.query.clone();
        self.begin_refresh(query)
    }

    /// Hand the response for `ticket` back to the controller.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Page<T>, FetchFailure>,
    ) -> FetchOutcome {
        if self.in_flight != Some(ticket.id) || ticket.session != self.session {
            debug!(
                ticket = ticket.id,
                ticket_session = ticket.session,
                session = self.session,
                "discarding stale fetch response"
            );
            return FetchOutcome::Stale;
        }

        self.in_flight = None;

        match result {
            Ok(page) => {
                let added = page.records.len();
                let total = self.accumulator.merge(page).records.len();
                self.state = FetchState::Idle;
                debug!(
                    ticket = ticket.id,
                    added,
                    total,
                    has_next = self.page_info().has_next_page,
                    "page merged"
                );
                FetchOutcome::Merged { added }
            }
            Err(failure) => {
                warn!(
                    ticket = ticket.id,
                    kind = ?ticket.kind,
                    message = %failure.message,
                    detail = failure.detail.as_deref().unwrap_or(""),
                    "fetch failed"
                );
                self.state = FetchState::Error(failure.clone());
                FetchOutcome::Failed(failure)
            }
        }
    }

    fn issue(&mut self, kind: FetchKind) -> FetchTicket {
        self.next_id += 1;
        self.in_flight = Some(self.next_id);
        self.state = FetchState::Fetching;

        let request = match kind {
            FetchKind::Initial => PageRequest::first(self.page_size, self.query.clone()),
            FetchKind::More => PageRequest::after(
                self.page_info().end_cursor.clone(),
                self.page_size,
                self.query.clone(),
            ),
        };

        debug!(
            ticket = self.next_id,
            session = self.session,
            ?kind,
            anchor = request.anchor.as_ref().map(|cursor| cursor.as_str()),
            "fetch issued"
        );

        FetchTicket {
            session: self.session,
            id: self.next_id,
            kind,
            request,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// True while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Fetching
    }

    /// True when a next page exists and nothing is in flight.
    pub fn can_load_more(&self) -> bool {
        self.page_info().has_next_page && !self.is_loading()
    }

    /// Skeleton rows to show while loading.
    pub fn loading_placeholder_count(&self) -> usize {
        if self.is_loading() {
            self.placeholder_rows
        } else {
            0
        }
    }

    /// Failure of the most recent fetch, if the controller is in its error state.
    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.state {
            FetchState::Error(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn result_set(&self) -> &ResultSet<T> {
        self.accumulator.result()
    }

    pub fn records(&self) -> &[T] {
        self.accumulator.records()
    }

    pub fn page_info(&self) -> &PageInfo {
        self.accumulator.page_info()
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Run `ticket` against `source` and complete it.
    pub async fn run<S>(&mut self, source: &S, ticket: FetchTicket) -> FetchOutcome
    where
        S: PageSource<Item = T> + ?Sized,
    {
        let result = source.fetch(ticket.request.clone()).await;
        self.complete(&ticket, result)
    }

    /// Load the next page from `source`; `None` when the request was ignored.
    pub async fn load_more<S>(&mut self, source: &S) -> Option<FetchOutcome>
    where
        S: PageSource<Item = T> + ?Sized,
    {
        let ticket = self.begin_load_more()?;
        Some(self.run(source, ticket).await)
    }

    /// Reset to `query` and load its first page from `source`.
    pub async fn refresh<S>(&mut self, source: &S, query: QueryParams) -> FetchOutcome
    where
        S: PageSource<Item = T> + ?Sized,
    {
        let ticket = self.begin_refresh(query);
        self.run(source, ticket).await
    }

    /// Keep loading until the source reports no next page.
    ///
    /// Stops early on an empty page, since an empty merge leaves the page info
    /// unchanged and would otherwise loop forever. Returns the record count.
    pub async fn drain<S>(&mut self, source: &S) -> Result<usize, FetchFailure>
    where
        S: PageSource<Item = T> + ?Sized,
    {
        while let Some(outcome) = self.load_more(source).await {
            match outcome {
                FetchOutcome::Failed(failure) => return Err(failure),
                FetchOutcome::Merged { added: 0 } | FetchOutcome::Stale => break,
                FetchOutcome::Merged { .. } => {}
            }
        }

        Ok(self.records().len())
    }
}
