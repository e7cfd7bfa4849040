use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pagewise_core::{
    Cursor, FetchFailure, Page, PageInfo, PageRequest, PageSource, QueryParams, Record,
};
use pagewise_paging::{
    FetchOutcome, FetchState, Header, LocalPageNavigator, PagedView, PaginationController,
    build_paged_table_view, build_table_view,
};

/// Replays canned responses and records every request it receives.
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Page, FetchFailure>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    fn new(responses: impl IntoIterator<Item = Result<Page, FetchFailure>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    fn anchors(&self) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.anchor.as_ref().map(Cursor::to_string))
            .collect()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    type Item = Record;

    async fn fetch(&self, request: PageRequest) -> Result<Page, FetchFailure> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchFailure::new("script exhausted")))
    }
}

fn pin(barcode: &str) -> Record {
    Record::new()
        .with("barcode", barcode)
        .with("loopSize", 1)
        .with("status", "Ready")
}

fn pins(barcodes: &[&str]) -> Vec<Record> {
    barcodes.iter().map(|barcode| pin(barcode)).collect()
}

fn barcodes(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.get("barcode").map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn headers() -> Vec<Header> {
    vec![
        Header::new("barcode", "Barcode"),
        Header::new("loopSize", "Loop Size"),
        Header::new("status", "Status"),
    ]
}

#[tokio::test]
async fn single_row_then_load_more_disables_affordance() {
    let first = Record::new()
        .with("barcode", "A1")
        .with("loopSize", 1)
        .with("status", "ok");
    let second = Record::new()
        .with("barcode", "A2")
        .with("loopSize", 1)
        .with("status", "ok");
    let source = ScriptedSource::new([
        Ok(Page::new(vec![first], PageInfo::with_next("c1"))),
        Ok(Page::new(vec![second], PageInfo::last("c2"))),
    ]);

    let (mut ctl, ticket) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, ticket).await;

    let view = build_table_view("Pins", &headers(), &ctl);
    assert_eq!(view.rows.len(), 1);
    assert!(view.load_more.is_some_and(|button| button.enabled));

    ctl.load_more(&source).await;
    let view = build_table_view("Pins", &headers(), &ctl);
    assert_eq!(view.rows.len(), 2);
    assert!(view.load_more.is_some_and(|button| !button.enabled));
    assert_eq!(source.anchors(), [None, Some("c1".to_owned())]);
}

#[tokio::test]
async fn load_more_appends_until_exhausted() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1", "A2"]), PageInfo::with_next("c1"))),
        Ok(Page::new(pins(&["A3"]), PageInfo::last("c2"))),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    assert_eq!(ctl.run(&source, first).await, FetchOutcome::Merged { added: 2 });
    assert!(ctl.can_load_more());

    let outcome = ctl.load_more(&source).await;
    assert_eq!(outcome, Some(FetchOutcome::Merged { added: 1 }));
    assert_eq!(barcodes(ctl.records()), ["A1", "A2", "A3"]);
    assert!(!ctl.can_load_more());

    assert_eq!(ctl.load_more(&source).await, None);
    assert_eq!(source.anchors(), [None, Some("c1".to_owned())]);
}

#[tokio::test]
async fn failed_load_more_keeps_rows_and_shows_notice() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1", "A2"]), PageInfo::with_next("c1"))),
        Err(FetchFailure::new("network error").with_detail("connection reset")),
        Ok(Page::new(pins(&["A3"]), PageInfo::last("c2"))),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, first).await;

    let failed = ctl.load_more(&source).await;
    assert!(matches!(failed, Some(FetchOutcome::Failed(_))));

    let view = build_table_view("Pins", &headers(), &ctl);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.error_notice.as_deref(), Some("Error: network error connection reset"));
    assert!(view.load_more.is_some_and(|button| button.enabled));

    ctl.load_more(&source).await;
    assert_eq!(ctl.state(), &FetchState::Idle);
    assert_eq!(barcodes(ctl.records()), ["A1", "A2", "A3"]);
    assert_eq!(source.anchors(), [None, Some("c1".to_owned()), Some("c1".to_owned())]);
}

#[tokio::test]
async fn refresh_discards_previous_session() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1", "A2"]), PageInfo::with_next("c1"))),
        Ok(Page::new(pins(&["B1"]), PageInfo::last("c9"))),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, first).await;

    let query = QueryParams::filtered("status", "Dirty");
    assert_eq!(ctl.refresh(&source, query.clone()).await, FetchOutcome::Merged { added: 1 });
    assert_eq!(barcodes(ctl.records()), ["B1"]);
    assert_eq!(ctl.query(), &query);

    let requests = source.requests.lock().unwrap();
    assert_eq!(requests[1].anchor, None);
    assert_eq!(requests[1].query, query);
}

#[tokio::test]
async fn late_response_after_refresh_is_dropped() {
    let source = ScriptedSource::new([Ok(Page::new(pins(&["B1"]), PageInfo::last("c9")))]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    let refreshed = ctl.begin_refresh(QueryParams::filtered("status", "Broken"));

    let late = Ok(Page::new(pins(&["OLD"]), PageInfo::with_next("c1")));
    assert_eq!(ctl.complete(&first, late), FetchOutcome::Stale);

    ctl.run(&source, refreshed).await;
    assert_eq!(barcodes(ctl.records()), ["B1"]);
    assert!(!ctl.page_info().has_next_page);
}

#[tokio::test]
async fn drained_records_feed_the_navigator() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1", "A2"]), PageInfo::with_next("c1"))),
        Ok(Page::new(pins(&["A3", "A4"]), PageInfo::with_next("c2"))),
        Ok(Page::new(pins(&["A5", "A6"]), PageInfo::with_next("c3"))),
        Ok(Page::new(pins(&["A7"]), PageInfo::last("c4"))),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, first).await;
    assert_eq!(ctl.drain(&source).await, Ok(7));

    let mut nav = LocalPageNavigator::new(ctl.records().len(), &[5, 10], 5).unwrap();
    assert_eq!(nav.footer_label(), "Page 1/2");
    nav.next();

    let view = build_paged_table_view("Pins", &headers(), ctl.records(), &nav);
    let cells: Vec<&str> = view.rows.iter().map(|row| row.cells[0].1.as_str()).collect();
    assert_eq!(cells, ["A6", "A7"]);
}

#[tokio::test]
async fn drain_stops_on_empty_page() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1"]), PageInfo::with_next("c1"))),
        Ok(Page::empty(PageInfo::default())),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, first).await;

    assert_eq!(ctl.drain(&source).await, Ok(1));
    assert_eq!(source.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn drain_reports_failure() {
    let source = ScriptedSource::new([
        Ok(Page::new(pins(&["A1"]), PageInfo::with_next("c1"))),
        Err(FetchFailure::new("timeout")),
    ]);

    let (mut ctl, first) = PaginationController::new(2, 2, QueryParams::default()).unwrap();
    ctl.run(&source, first).await;

    let err = ctl.drain(&source).await.unwrap_err();
    assert_eq!(err.message, "timeout");
    assert_eq!(ctl.records().len(), 1);
}
