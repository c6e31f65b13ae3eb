/// Movie backend abstraction
///
/// The backend owns persistence and the recommendation algorithm. This crate
/// only talks to it through this trait, so the HTTP client can be swapped for
/// an in-memory fake in tests. Titles are the sole identifier on every call.
use crate::{
    error::AppResult,
    models::{
        CollectionName, KeywordAnalysis, MoveRequest, MoviesResponse, NewMovie, Preferences,
        Suggestion,
    },
};

pub mod http;

pub use http::HttpBackend;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieBackend: Send + Sync {
    /// All four collections, plus stored preferences when the backend has them
    async fn fetch_movies(&self) -> AppResult<MoviesResponse>;

    /// Genre names offered for preference editing and filtering
    async fn fetch_genres(&self) -> AppResult<Vec<String>>;

    /// Liked/disliked keyword counts derived from rated movies
    async fn fetch_keyword_analysis(&self) -> AppResult<KeywordAnalysis>;

    /// Inserts a new movie into `collection`
    async fn add_movie(&self, collection: CollectionName, movie: &NewMovie) -> AppResult<()>;

    /// Moves an owned movie to another collection, optionally rescoring it
    async fn move_movie(&self, request: &MoveRequest) -> AppResult<()>;

    /// Removes a movie from whichever collection holds it
    async fn delete_movie(&self, title: &str) -> AppResult<()>;

    /// Replaces the stored preferences
    async fn update_preferences(&self, preferences: &Preferences) -> AppResult<()>;

    /// Next AI suggestion from the backend's queue
    async fn suggest(&self) -> AppResult<Suggestion>;

    /// Suggestion-shaped details for a title the user typed in
    async fn movie_details(&self, title: &str) -> AppResult<Suggestion>;

    /// One title related to `title`, never any of `previous_suggestions`
    async fn related_movie(
        &self,
        title: &str,
        previous_suggestions: &[String],
    ) -> AppResult<Suggestion>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
