use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Collections, KeywordAnalysis, Preferences};

/// Session-scoped application state
///
/// Created once per session and handed to the `CollectionStore`, which is the
/// only writer. Everything else reads through the store.
#[derive(Clone, Default)]
pub struct AppState {
    pub(crate) inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state guarded by the lock
#[derive(Debug, Default)]
pub struct AppStateInner {
    pub collections: Collections,
    pub preferences: Preferences,
    /// Fetched once at session start and never refreshed
    pub keyword_analysis: KeywordAnalysis,
    /// Fetched once at session start and never refreshed
    pub genres: Vec<String>,
}

impl AppState {
    /// Creates a new empty session state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session state seeded with a known snapshot
    pub fn with_collections(collections: Collections) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                collections,
                ..Default::default()
            })),
        }
    }
}
