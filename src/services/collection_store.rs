use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        CollectionName, Collections, KeywordAnalysis, MoveRequest, Movie, NewMovie, Preferences,
        DEFAULT_WATCHED_SCORE, MAX_SCORE, MIN_SCORE,
    },
    services::{
        backend::MovieBackend,
        notifications::{Notice, Notifier},
    },
    state::AppState,
};

/// Authoritative in-memory cache of the four collections
///
/// Every successful mutation is followed by a full reload from the backend
/// instead of a local patch, so the snapshot always converges to the last
/// server answer. Concurrent mutations are not serialized: whichever reload
/// resolves last wins. A failed call never touches the snapshot.
#[derive(Clone)]
pub struct CollectionStore {
    backend: Arc<dyn MovieBackend>,
    state: AppState,
    notifier: Notifier,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn MovieBackend>, state: AppState, notifier: Notifier) -> Self {
        Self {
            backend,
            state,
            notifier,
        }
    }

    /// First synchronization of a session
    ///
    /// Loads the collections, then fetches keyword analysis and genres once.
    /// Those two are not refreshed by later mutations; their failures are
    /// only logged and leave the defaults in place.
    pub async fn initialize(&self) -> AppResult<()> {
        let loaded = self.load().await;

        match self.backend.fetch_keyword_analysis().await {
            Ok(analysis) => {
                tracing::info!(
                    liked = analysis.liked.len(),
                    disliked = analysis.disliked.len(),
                    "Keyword analysis loaded"
                );
                self.state.inner.write().await.keyword_analysis = analysis;
            }
            Err(e) => tracing::error!(error = %e, "Error fetching keyword analysis"),
        }

        match self.backend.fetch_genres().await {
            Ok(genres) => {
                tracing::info!(genres = genres.len(), "Genres loaded");
                self.state.inner.write().await.genres = genres;
            }
            Err(e) => tracing::error!(error = %e, "Error fetching genres"),
        }

        loaded
    }

    /// Replaces the snapshot with the backend's current collections
    ///
    /// Preferences are refreshed too when the backend returns them.
    pub async fn load(&self) -> AppResult<()> {
        let response = match self.backend.fetch_movies().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load collections");
                self.notifier
                    .notify(Notice::error("Error fetching movies", e.user_detail()));
                return Err(e);
            }
        };

        let duplicates = response.collections.duplicate_titles();
        if !duplicates.is_empty() {
            tracing::warn!(
                ?duplicates,
                "Backend snapshot holds titles in more than one collection"
            );
        }

        let total = response.collections.len();
        let mut state = self.state.inner.write().await;
        state.collections = response.collections;
        if let Some(preferences) = response.preferences {
            state.preferences = preferences;
        }

        tracing::info!(total, "Collections synchronized");
        Ok(())
    }

    /// Adds a new movie to `collection`
    ///
    /// Scores only travel with `watched` adds, defaulting to 5 when missing.
    pub async fn add_movie(&self, collection: CollectionName, mut movie: NewMovie) -> AppResult<()> {
        validate_title(&movie.title)?;
        movie.score = if collection.keeps_score() {
            Some(validate_score(movie.score.unwrap_or(DEFAULT_WATCHED_SCORE))?)
        } else {
            None
        };

        let result = self.backend.add_movie(collection, &movie).await;
        self.finish_mutation(
            result,
            "Movie added successfully",
            "Error adding movie",
        )
        .await?;

        tracing::info!(title = %movie.title, collection = %collection, "Movie added");
        Ok(())
    }

    /// Moves an owned movie to `to`
    ///
    /// Moving into `watched` requires a score; any other target clears it.
    pub async fn move_movie(
        &self,
        title: &str,
        to: CollectionName,
        score: Option<u8>,
    ) -> AppResult<()> {
        validate_title(title)?;
        let new_score = if to.keeps_score() {
            let score = score.ok_or_else(|| {
                AppError::InvalidInput("Score is required for watched movies".to_string())
            })?;
            Some(validate_score(score)?)
        } else {
            None
        };

        let request = MoveRequest {
            title: title.to_string(),
            new_list: to,
            new_score,
        };

        let result = self.backend.move_movie(&request).await;
        self.finish_mutation(
            result,
            "Movie updated successfully",
            "Error updating movie",
        )
        .await?;

        tracing::info!(title = %title, to = %to, score = ?new_score, "Movie moved");
        Ok(())
    }

    /// Removes a movie from whichever collection holds it
    pub async fn delete_movie(&self, title: &str) -> AppResult<()> {
        validate_title(title)?;

        let result = self.backend.delete_movie(title).await;
        self.finish_mutation(
            result,
            "Movie deleted successfully",
            "Error deleting movie",
        )
        .await?;

        tracing::info!(title = %title, "Movie deleted");
        Ok(())
    }

    /// Pushes `preferences` wholesale to the backend
    pub async fn update_preferences(&self, preferences: Preferences) -> AppResult<()> {
        let result = self.backend.update_preferences(&preferences).await;
        self.finish_mutation(result, "Preferences updated", "Error updating preferences")
            .await?;

        // The reload may already carry them back; keep what was saved either way.
        self.state.inner.write().await.preferences = preferences;
        tracing::info!("Preferences saved");
        Ok(())
    }

    /// Reports a mutation's outcome and resynchronizes on success
    ///
    /// A failed reload after a successful mutation is notified and logged by
    /// `load`, but does not turn the mutation into a failure.
    async fn finish_mutation(
        &self,
        result: AppResult<()>,
        success_title: &str,
        error_title: &str,
    ) -> AppResult<()> {
        if let Err(e) = result {
            tracing::error!(error = %e, "{}", error_title);
            self.notifier
                .notify(Notice::error(error_title, e.user_detail()));
            return Err(e);
        }

        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "Resynchronization after mutation failed");
        }

        self.notifier.notify(Notice::success(success_title));
        Ok(())
    }

    /// Copy of the current snapshot
    pub async fn collections(&self) -> Collections {
        self.state.inner.read().await.collections.clone()
    }

    pub async fn collection(&self, name: CollectionName) -> Vec<Movie> {
        self.state.inner.read().await.collections.get(name).to_vec()
    }

    /// Owning collection and movie for an exact title
    pub async fn find(&self, title: &str) -> Option<(CollectionName, Movie)> {
        self.state
            .inner
            .read()
            .await
            .collections
            .find(title)
            .map(|(name, movie)| (name, movie.clone()))
    }

    pub async fn owner_of(&self, title: &str) -> Option<CollectionName> {
        self.find(title).await.map(|(name, _)| name)
    }

    pub async fn preferences(&self) -> Preferences {
        self.state.inner.read().await.preferences.clone()
    }

    pub async fn keyword_analysis(&self) -> KeywordAnalysis {
        self.state.inner.read().await.keyword_analysis.clone()
    }

    /// Keywords by frequency across liked and disliked counts
    pub async fn sorted_keywords(&self) -> Vec<String> {
        self.state.inner.read().await.keyword_analysis.sorted_keywords()
    }

    pub async fn genres(&self) -> Vec<String> {
        self.state.inner.read().await.genres.clone()
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_score(score: u8) -> AppResult<u8> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }
    Ok(score)
}
