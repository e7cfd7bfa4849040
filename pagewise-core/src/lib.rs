/// Shared application context.
pub mod context;
/// Configuration and fetch error types.
pub mod error;
/// Page values and cursor metadata.
pub mod page;
/// Open record bag.
pub mod record;
/// Environment-driven settings.
pub mod settings;
/// Fetch collaborator port.
pub mod source;

pub use context::Context;
pub use error::{ConfigurationError, FetchFailure};
pub use page::{Cursor, Page, PageInfo};
pub use record::{FieldValue, Record};
pub use settings::{BrowseMode, Settings};
pub use source::{Credential, DynRecordSource, Filter, PageRequest, PageSource, QueryParams};
