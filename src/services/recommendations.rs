use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::{CollectionName, Presented, Suggestion},
    services::{
        backend::MovieBackend,
        collection_store::CollectionStore,
        notifications::{Notice, Notifier},
    },
};

/// Where the recommendation surface currently is
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    Idle,
    Loading,
    Presenting(Presented),
    Error(String),
}

impl EngineState {
    pub fn label(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Loading => "loading",
            EngineState::Presenting(_) => "presenting",
            EngineState::Error(_) => "error",
        }
    }

    pub fn presented(&self) -> Option<&Presented> {
        match self {
            EngineState::Presenting(presented) => Some(presented),
            _ => None,
        }
    }
}

/// What an `accept` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// An already-owned title changed collection; the surface closed
    Moved,
    /// A related-browsing suggestion was promoted and stays on screen
    Promoted,
    /// A top-level suggestion was promoted and the next one was requested
    Advanced,
}

/// Drives suggestion retrieval, classification and promotion
///
/// The state is published on a watch channel so a presentation layer can
/// render loading indicators. There is no cancellation: a response that
/// resolves after `close` is still applied.
#[derive(Clone)]
pub struct RecommendationEngine {
    store: CollectionStore,
    backend: Arc<dyn MovieBackend>,
    notifier: Notifier,
    state: Arc<watch::Sender<EngineState>>,
}

impl RecommendationEngine {
    pub fn new(store: CollectionStore, backend: Arc<dyn MovieBackend>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(EngineState::Idle);
        Self {
            store,
            backend,
            notifier,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    /// Fetches a fresh suggestion (`Idle` or `Presenting` only)
    pub async fn request_suggestion(&self) -> AppResult<()> {
        self.guard("request a suggestion", |s| {
            matches!(s, EngineState::Idle | EngineState::Presenting(_))
        })?;
        self.fetch_suggestion().await
    }

    /// Discards the current suggestion and fetches another
    pub async fn get_another(&self) -> AppResult<()> {
        self.guard("get another suggestion", |s| {
            matches!(s, EngineState::Presenting(_))
        })?;
        self.fetch_suggestion().await
    }

    /// Looks up a title the user typed in and presents it
    pub async fn request_details(&self, title: &str) -> AppResult<()> {
        self.guard("request details", |s| {
            matches!(s, EngineState::Idle | EngineState::Presenting(_))
        })?;
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }

        self.transition(EngineState::Loading);
        match self.backend.movie_details(title.trim()).await {
            Ok(mut suggestion) => {
                suggestion.from_recommendation = false;
                self.present(suggestion).await;
                Ok(())
            }
            Err(e) => Err(self.fail("Error getting movie details", e)),
        }
    }

    /// Presents a movie the user opened from one of the collections
    pub async fn open_owned(&self, title: &str) -> AppResult<()> {
        self.guard("open a movie", |s| {
            matches!(s, EngineState::Idle | EngineState::Presenting(_))
        })?;
        let (collection, movie) = self
            .store
            .find(title)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Movie not in any list: {}", title)))?;

        self.transition(EngineState::Presenting(Presented::Owned { movie, collection }));
        Ok(())
    }

    /// Switches the surface to a movie picked from the related list
    ///
    /// Owned titles open as owned movies; anything else is presented as a
    /// suggestion reached through related browsing.
    pub async fn select_related(&self, mut suggestion: Suggestion) -> AppResult<()> {
        self.guard("select a related movie", |s| {
            matches!(s, EngineState::Presenting(_))
        })?;

        let next = match self.store.find(&suggestion.title).await {
            Some((collection, movie)) => Presented::Owned { movie, collection },
            None => {
                suggestion.classify(None);
                suggestion.from_recommendation = true;
                Presented::Suggested(suggestion)
            }
        };
        self.transition(EngineState::Presenting(next));
        Ok(())
    }

    /// Commits the presented movie into `target`
    ///
    /// Owned titles are moved and the surface closes. New titles are added;
    /// a related-browsing suggestion then stays presented (now in a list),
    /// while a top-level suggestion is replaced by a freshly requested one.
    /// On failure the surface keeps presenting the same movie.
    pub async fn accept(
        &self,
        target: CollectionName,
        score: Option<u8>,
    ) -> AppResult<AcceptOutcome> {
        let presented = match self.state() {
            EngineState::Presenting(presented) => presented,
            other => {
                return Err(AppError::InvalidTransition {
                    action: "accept",
                    state: other.label(),
                })
            }
        };

        let mut suggestion = match presented {
            Presented::Suggested(suggestion) if !suggestion.is_in_list => suggestion,
            owned => {
                self.store.move_movie(owned.title(), target, score).await?;
                tracing::info!(title = %owned.title(), to = %target, "Owned movie moved, closing");
                self.transition(EngineState::Idle);
                return Ok(AcceptOutcome::Moved);
            }
        };

        self.store
            .add_movie(target, suggestion.to_new_movie(score))
            .await?;

        if suggestion.from_recommendation {
            suggestion.classify(Some(target));
            tracing::info!(title = %suggestion.title, to = %target, "Related suggestion promoted");
            self.transition(EngineState::Presenting(Presented::Suggested(suggestion)));
            return Ok(AcceptOutcome::Promoted);
        }

        tracing::info!(title = %suggestion.title, to = %target, "Suggestion promoted, fetching next");
        if let Err(e) = self.fetch_suggestion().await {
            tracing::warn!(error = %e, "Next suggestion failed after promotion");
        }
        Ok(AcceptOutcome::Advanced)
    }

    /// Clears an error so the surface can be used again
    pub fn acknowledge(&self) -> AppResult<()> {
        self.guard("acknowledge", |s| matches!(s, EngineState::Error(_)))?;
        self.transition(EngineState::Idle);
        Ok(())
    }

    /// Closes the surface and discards whatever it showed
    pub fn close(&self) {
        self.transition(EngineState::Idle);
    }

    async fn fetch_suggestion(&self) -> AppResult<()> {
        self.transition(EngineState::Loading);
        match self.backend.suggest().await {
            Ok(mut suggestion) => {
                suggestion.from_recommendation = false;
                self.present(suggestion).await;
                Ok(())
            }
            Err(e) => Err(self.fail("Error getting suggestion", e)),
        }
    }

    /// Classifies against the collections and enters `Presenting`
    async fn present(&self, mut suggestion: Suggestion) {
        let owner = self.store.owner_of(&suggestion.title).await;
        suggestion.classify(owner);
        tracing::info!(
            title = %suggestion.title,
            is_in_list = suggestion.is_in_list,
            list = ?owner,
            "Presenting suggestion"
        );
        self.transition(EngineState::Presenting(Presented::Suggested(suggestion)));
    }

    fn fail(&self, title: &str, error: AppError) -> AppError {
        tracing::error!(error = %error, "{}", title);
        self.notifier.notify(Notice::error(title, error.user_detail()));
        self.transition(EngineState::Error(error.user_detail()));
        error
    }

    fn guard(&self, action: &'static str, allowed: impl Fn(&EngineState) -> bool) -> AppResult<()> {
        let state = self.state.borrow();
        if allowed(&*state) {
            return Ok(());
        }
        tracing::warn!(action, state = state.label(), "Rejected engine transition");
        Err(AppError::InvalidTransition {
            action,
            state: state.label(),
        })
    }

    fn transition(&self, next: EngineState) {
        let to = next.label();
        let previous = self.state.send_replace(next);
        tracing::debug!(from = previous.label(), to, "Engine transition");
    }
}
