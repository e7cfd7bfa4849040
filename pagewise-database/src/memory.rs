use async_trait::async_trait;
use pagewise_core::{FetchFailure, Filter, Page, PageInfo, PageRequest, PageSource, Record};
use pagewise_paging::{build_cursor, validate_cursor};
use tokio::sync::RwLock;
use tracing::debug;

/// Keyset page source over records held in memory.
///
/// Records are kept sorted by the display value of `key_field`, which must be
/// unique. Cursors are scoped to `scope`.
#[derive(Debug)]
pub struct MemoryPageSource {
    scope: String,
    key_field: String,
    records: RwLock<Vec<Record>>,
}

impl MemoryPageSource {
    pub fn new(
        scope: impl Into<String>,
        key_field: impl Into<String>,
        mut records: Vec<Record>,
    ) -> Self {
        let key_field = key_field.into();
        records.sort_by_cached_key(|record| key_of(record, &key_field));

        Self {
            scope: scope.into(),
            key_field,
            records: RwLock::new(records),
        }
    }

    /// Insert or replace the record with the same key.
    pub async fn upsert(&self, record: Record) {
        let key = key_of(&record, &self.key_field);
        let mut records = self.records.write().await;

        match records.binary_search_by(|existing| key_of(existing, &self.key_field).cmp(&key)) {
            Ok(index) => records[index] = record,
            Err(index) => records.insert(index, record),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PageSource for MemoryPageSource {
    type Item = Record;

    async fn fetch(&self, request: PageRequest) -> Result<Page, FetchFailure> {
        let anchor = match &request.anchor {
            Some(cursor) => Some(validate_cursor(cursor, &self.scope).map_err(|err| {
                FetchFailure::new("invalid cursor").with_detail(err.to_string())
            })?),
            None => None,
        };

        let records = self.records.read().await;
        let matching: Vec<&Record> = records
            .iter()
            .filter(|record| matches_filter(record, request.query.filter.as_ref()))
            .collect();

        let start = match &anchor {
            Some(anchor) => {
                matching.partition_point(|record| key_of(record, &self.key_field) <= *anchor)
            }
            None => 0,
        };
        let end = start.saturating_add(request.page_size).min(matching.len());
        let page: Vec<Record> = matching[start..end].iter().copied().cloned().collect();

        let cursor = |record: &Record| build_cursor(&self.scope, &key_of(record, &self.key_field));
        let page_info = PageInfo {
            has_previous_page: start > 0,
            has_next_page: end < matching.len(),
            start_cursor: page.first().map(cursor),
            end_cursor: page.last().map(cursor),
        };

        debug!(
            scope = %self.scope,
            query = %request.query,
            anchor = anchor.as_deref(),
            returned = page.len(),
            has_next = page_info.has_next_page,
            "memory page served"
        );

        Ok(Page::new(page, page_info))
    }
}

fn key_of(record: &Record, key_field: &str) -> String {
    record.get(key_field).map(ToString::to_string).unwrap_or_default()
}

fn matches_filter(record: &Record, filter: Option<&Filter>) -> bool {
    filter.is_none_or(|filter| {
        record
            .get(&filter.field)
            .is_some_and(|value| value.to_string() == filter.value)
    })
}

/// A small pin library used when no database is configured.
pub fn seed_library_pins() -> Vec<Record> {
    const STATUSES: [&str; 4] = ["Ready", "Occupied", "Dirty", "Broken"];
    const LOOP_SIZES: [i16; 3] = [50, 100, 200];

    (1..=23)
        .map(|index: usize| {
            Record::new()
                .with("barcode", format!("DLSL-{index:04}"))
                .with("loopSize", LOOP_SIZES[index % LOOP_SIZES.len()])
                .with("status", STATUSES[index % STATUSES.len()])
        })
        .collect()
}
