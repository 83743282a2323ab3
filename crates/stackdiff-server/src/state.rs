//! Shared handler state.

use stackdiff_engine::BatchSettings;
use stackdiff_github::SourceControl;
use stackdiff_store::SqliteDiffStore;
use std::sync::Arc;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteDiffStore>,
    pub source: Arc<dyn SourceControl>,
    pub settings: Arc<BatchSettings>,
}

impl AppState {
    pub fn new(
        store: SqliteDiffStore,
        source: Arc<dyn SourceControl>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            store: Arc::new(store),
            source,
            settings: Arc::new(settings),
        }
    }
}
