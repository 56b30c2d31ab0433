use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentConverter;
use crate::history::HistoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable document-to-text converter. Default: `NativeConverter`.
    pub converter: Arc<dyn DocumentConverter>,
    pub history: Arc<HistoryStore>,
}
