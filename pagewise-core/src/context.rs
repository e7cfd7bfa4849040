use std::sync::Arc;

use crate::settings::Settings;
use crate::source::DynRecordSource;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub source: Arc<DynRecordSource>,
    pub settings: Arc<Settings>,
}

impl Context {
    /// Create a new application context.
    pub fn new(source: Arc<DynRecordSource>, settings: Settings) -> Self {
        Self {
            source,
            settings: Arc::new(settings),
        }
    }
}
