//! Error taxonomy shared across pagewise crates.

use thiserror::Error;

/// Invalid construction-time configuration. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The allowed page size set was empty.
    #[error("allowed page sizes must not be empty")]
    EmptyPageSizes,
    /// A page size was zero.
    #[error("{0} must be greater than zero")]
    NonPositivePageSize(&'static str),
    /// A configured value could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    /// A SQL identifier contained characters outside `[a-z0-9_]`.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
    /// The key column was also listed under a different field name.
    #[error("key column {column:?} is selected as {listed:?} but keyed as {expected:?}")]
    KeyFieldMismatch {
        column: String,
        expected: String,
        listed: String,
    },
}

/// A failed fetch, as reported by a page source.
///
/// Non-fatal: the controller turns it into its error state and keeps the
/// records loaded so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    /// Human-readable message.
    pub message: String,
    /// Optional auxiliary detail shown after the message.
    pub detail: Option<String>,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
