use async_trait::async_trait;
use pagewise_core::{
    ConfigurationError, FetchFailure, FieldValue, Page, PageInfo, PageRequest, PageSource, Record,
};
use pagewise_paging::{build_cursor, validate_cursor};
use sqlx::{Column, Row, TypeInfo, postgres::PgRow};
use tracing::{debug, error};

use crate::Database;

/// Marks the single row at or before the anchor that is fetched alongside a
/// page to answer `has_previous_page`.
const BEFORE_MARKER: &str = "pagewise_before";

/// One selected column and the record field it is exposed as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub column: String,
    pub field: String,
}

impl ColumnSpec {
    /// Column exposed under its own name.
    pub fn new(column: &str) -> Result<Self, ConfigurationError> {
        Self::aliased(column, column)
    }

    /// Column exposed as `field`.
    pub fn aliased(column: &str, field: impl Into<String>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            column: identifier(column)?,
            field: field.into(),
        })
    }
}

/// Table, keyset column and selected columns of a paged query.
///
/// The key column must be textual and unique; it is always selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    table: String,
    key: ColumnSpec,
    columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(
        table: &str,
        key: ColumnSpec,
        mut columns: Vec<ColumnSpec>,
    ) -> Result<Self, ConfigurationError> {
        let table = identifier(table)?;
        match columns.iter().find(|column| column.column == key.column) {
            Some(listed) if listed.field != key.field => {
                return Err(ConfigurationError::KeyFieldMismatch {
                    column: key.column,
                    expected: key.field,
                    listed: listed.field.clone(),
                });
            }
            Some(_) => {}
            None => columns.insert(0, key.clone()),
        }

        Ok(Self {
            table,
            key,
            columns,
        })
    }

    /// `pin_library (barcode, loop_size, status)` as created by the bundled migrations.
    pub fn pin_library() -> Result<Self, ConfigurationError> {
        Self::new(
            "pin_library",
            ColumnSpec::new("barcode")?,
            vec![
                ColumnSpec::new("barcode")?,
                ColumnSpec::aliased("loop_size", "loopSize")?,
                ColumnSpec::new("status")?,
            ],
        )
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Record field holding the keyset value.
    pub fn key_field(&self) -> &str {
        &self.key.field
    }

    /// Column backing record field `field`.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| column.field == field)
            .map(|column| column.column.as_str())
    }

    /// SQL for one page.
    ///
    /// Parameters in order: the anchor key (when `anchored`), the filter value
    /// (when `filter_column` is set), then the row limit. When anchored, the
    /// nearest row at or before the anchor comes back first, flagged by
    /// [`BEFORE_MARKER`]; the outer `ORDER BY` pins that order since
    /// `UNION ALL` alone does not.
    pub(crate) fn page_sql(&self, anchored: bool, filter_column: Option<&str>) -> String {
        let mut params = 0;
        let mut param = || {
            params += 1;
            format!("${params}")
        };

        let anchor = anchored.then(&mut param);
        let filter = filter_column.map(|column| format!("{column}::text = {}", param()));
        let limit = param();

        let columns = self
            .columns
            .iter()
            .map(|column| column.column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let table = &self.table;
        let key = &self.key.column;

        let conditions = |op: &str| {
            let clauses: Vec<String> = anchor
                .iter()
                .map(|anchor| format!("{key} {op} {anchor}"))
                .chain(filter.iter().cloned())
                .collect();

            if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            }
        };

        let page = format!(
            "SELECT FALSE AS {BEFORE_MARKER}, {columns} FROM {table}{} \
             ORDER BY {key} LIMIT {limit}",
            conditions(">")
        );

        if anchored {
            format!(
                "SELECT * FROM ((SELECT TRUE AS {BEFORE_MARKER}, {columns} FROM {table}{} \
                 ORDER BY {key} DESC LIMIT 1) UNION ALL ({page})) AS anchored_page \
                 ORDER BY {BEFORE_MARKER} DESC, {key}",
                conditions("<=")
            )
        } else {
            page
        }
    }

    fn decode(&self, row: &PgRow) -> Result<Record, sqlx::Error> {
        self.columns
            .iter()
            .map(|column| Ok((column.field.clone(), decode_value(row, &column.column)?)))
            .collect()
    }
}

/// Keyset page source over a PostgreSQL table.
pub struct PgPageSource {
    db: Database,
    spec: TableSpec,
}

impl PgPageSource {
    pub fn new(db: Database, spec: TableSpec) -> Self {
        Self { db, spec }
    }
}

#[async_trait]
impl PageSource for PgPageSource {
    type Item = Record;

    async fn fetch(&self, request: PageRequest) -> Result<Page, FetchFailure> {
        let spec = &self.spec;

        let anchor = match &request.anchor {
            Some(cursor) => Some(validate_cursor(cursor, spec.table()).map_err(|err| {
                FetchFailure::new("invalid cursor").with_detail(err.to_string())
            })?),
            None => None,
        };

        let filter = match &request.query.filter {
            Some(filter) => {
                let column = spec.column_for(&filter.field).ok_or_else(|| {
                    FetchFailure::new("unknown filter field").with_detail(filter.field.clone())
                })?;
                Some((column, filter.value.as_str()))
            }
            None => None,
        };

        let sql = spec.page_sql(anchor.is_some(), filter.map(|(column, _)| column));
        let limit = i64::try_from(request.page_size)
            .unwrap_or(i64::MAX)
            .saturating_add(1);

        let mut query = sqlx::query(&sql);
        if let Some(anchor) = anchor.as_deref() {
            query = query.bind(anchor);
        }
        if let Some((_, value)) = filter {
            query = query.bind(value);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(self.db.pool()).await.map_err(|source| {
            error!(?source, table = spec.table(), "page query failed");
            FetchFailure::new("database query failed").with_detail(source.to_string())
        })?;

        let mut has_previous_page = false;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let before: bool = row.try_get(BEFORE_MARKER).map_err(decode_failure)?;
            if before {
                has_previous_page = true;
            } else {
                records.push(spec.decode(row).map_err(decode_failure)?);
            }
        }

        let has_next_page = records.len() > request.page_size;
        records.truncate(request.page_size);

        let cursor = |record: &Record| {
            let key = record.get(spec.key_field()).map(ToString::to_string).unwrap_or_default();
            build_cursor(spec.table(), &key)
        };
        let page_info = PageInfo {
            has_previous_page,
            has_next_page,
            start_cursor: records.first().map(cursor),
            end_cursor: records.last().map(cursor),
        };

        debug!(
            table = spec.table(),
            query = %request.query,
            anchor = anchor.as_deref(),
            returned = records.len(),
            has_next = has_next_page,
            "postgres page served"
        );

        Ok(Page::new(records, page_info))
    }
}

fn decode_failure(source: sqlx::Error) -> FetchFailure {
    error!(?source, "failed to decode page row");
    FetchFailure::new("failed to decode row").with_detail(source.to_string())
}

fn decode_value(row: &PgRow, column: &str) -> Result<FieldValue, sqlx::Error> {
    let type_name = row.try_column(column)?.type_info().name().to_owned();

    let value = match type_name.as_str() {
        "BOOL" => row.try_get::<Option<bool>, _>(column)?.into(),
        "INT2" => row.try_get::<Option<i16>, _>(column)?.into(),
        "INT4" => row.try_get::<Option<i32>, _>(column)?.into(),
        "INT8" => row.try_get::<Option<i64>, _>(column)?.into(),
        "FLOAT4" => row.try_get::<Option<f32>, _>(column)?.map(f64::from).into(),
        "FLOAT8" => row.try_get::<Option<f64>, _>(column)?.into(),
        // Text, enums and anything else with a textual wire form.
        _ => row.try_get_unchecked::<Option<String>, _>(column)?.into(),
    };

    Ok(value)
}

/// Accept `[a-z0-9_]` identifiers that do not start with a digit.
fn identifier(raw: &str) -> Result<String, ConfigurationError> {
    let valid = raw
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_lowercase() || first == '_')
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(raw.to_owned())
    } else {
        Err(ConfigurationError::InvalidIdentifier(raw.to_owned()))
    }
}
