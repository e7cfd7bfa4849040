//! Fetch collaborator port: the only I/O the pagination engine depends on.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchFailure;
use crate::page::{Cursor, Page};
use crate::record::Record;

/// Equality filter on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// Query parameters of a browse session.
///
/// Changing them starts a new session; they are never changed by "load more".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub filter: Option<Filter>,
}

impl QueryParams {
    /// Parameters selecting records whose `field` displays as `value`.
    pub fn filtered(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            filter: Some(Filter {
                field: field.into(),
                value: value.into(),
            }),
        }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{}={}", filter.field, filter.value),
            None => f.write_str("all"),
        }
    }
}

/// A parameterized fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Fetch strictly after this cursor; `None` requests the first page.
    pub anchor: Option<Cursor>,
    pub page_size: usize,
    pub query: QueryParams,
}

impl PageRequest {
    /// Request for the first page of a session.
    pub fn first(page_size: usize, query: QueryParams) -> Self {
        Self {
            anchor: None,
            page_size,
            query,
        }
    }

    /// Request for the page following `anchor`.
    pub fn after(anchor: Option<Cursor>, page_size: usize, query: QueryParams) -> Self {
        Self {
            anchor,
            page_size,
            query,
        }
    }
}

/// Executes page requests. Transport, auth and retries live behind this trait.
///
/// Each call resolves exactly once, with a page or a failure.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Row type produced by this source.
    type Item: Send;

    async fn fetch(&self, request: PageRequest) -> Result<Page<Self::Item>, FetchFailure>;
}

/// Type-erased record source held by the shared context.
pub type DynRecordSource = dyn PageSource<Item = Record>;

#[async_trait]
impl<S> PageSource for Arc<S>
where
    S: PageSource + ?Sized,
{
    type Item = S::Item;

    async fn fetch(&self, request: PageRequest) -> Result<Page<Self::Item>, FetchFailure> {
        (**self).fetch(request).await
    }
}

/// Opaque secret handed to a source at construction time.
///
/// `Debug` output is redacted so settings can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Reveal the secret to the component that needs it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageInfo;

    struct Fixed;

    #[async_trait]
    impl PageSource for Fixed {
        type Item = Record;

        async fn fetch(&self, request: PageRequest) -> Result<Page<Record>, FetchFailure> {
            let record = Record::new().with("anchor", request.anchor.map(|c| c.to_string()));
            Ok(Page::new(vec![record], PageInfo::default()))
        }
    }

    #[tokio::test]
    async fn arc_dyn_source_forwards_requests() {
        let source: Arc<DynRecordSource> = Arc::new(Fixed);
        let page = source
            .fetch(PageRequest::after(
                Some(Cursor::from("c1")),
                2,
                QueryParams::default(),
            ))
            .await
            .unwrap();

        assert_eq!(page.records[0].get("anchor").unwrap().to_string(), "c1");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("hunter2");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.expose(), "hunter2");
    }

    #[test]
    fn query_params_display() {
        assert_eq!(QueryParams::default().to_string(), "all");
        assert_eq!(QueryParams::filtered("status", "Ready").to_string(), "status=Ready");
    }
}
