use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    config::Config,
    error::AppResult,
    models::CollectionName,
    services::{
        CollectionStore, HttpBackend, MovieBackend, Notice, Notifier, PaginatedView,
        ProjectionConfig, RecommendationEngine, RelatedBrowser,
    },
    state::AppState,
};

/// One user session: owned state plus the services that operate on it
///
/// Built once at session start and handed to whatever drives the UI. The
/// collections are written only through `store`.
#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn MovieBackend>,
    pub store: CollectionStore,
    pub engine: RecommendationEngine,
}

impl Session {
    pub fn new(backend: Arc<dyn MovieBackend>, notifier: Notifier) -> Self {
        let store = CollectionStore::new(backend.clone(), AppState::new(), notifier.clone());
        let engine = RecommendationEngine::new(store.clone(), backend.clone(), notifier);
        Self {
            backend,
            store,
            engine,
        }
    }

    /// HTTP-backed session plus the receiver for user-facing notices
    pub fn from_config(config: &Config) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notifier, notices) = Notifier::channel();
        let backend: Arc<dyn MovieBackend> = Arc::new(HttpBackend::from_config(config));
        (Self::new(backend, notifier), notices)
    }

    /// Initial synchronization with the backend
    pub async fn start(&self) -> AppResult<()> {
        tracing::info!(backend = self.backend.name(), "Starting session");
        self.store.initialize().await
    }

    /// Related-movies panel sharing this session's backend
    pub fn related_browser(&self) -> RelatedBrowser {
        RelatedBrowser::new(self.backend.clone())
    }

    /// Paginated view over the current snapshot of one collection
    pub async fn view(&self, collection: CollectionName, config: ProjectionConfig) -> PaginatedView {
        let movies = self.store.collection(collection).await;
        PaginatedView::new(&movies, config)
    }
}
