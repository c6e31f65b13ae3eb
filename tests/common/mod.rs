#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tokio::sync::Semaphore;

use movie_curator::{
    error::{AppError, AppResult},
    models::{
        CollectionName, Collections, KeywordAnalysis, MoveRequest, Movie, MoviesResponse,
        NewMovie, Preferences, Suggestion,
    },
    services::MovieBackend,
};

pub const ADDED_DATE: &str = "2024-06-01";

/// Backend double with the real server's collection semantics
#[derive(Default)]
pub struct InMemoryBackend {
    pub collections: Mutex<Collections>,
    pub preferences: Mutex<Option<Preferences>>,
    pub suggestions: Mutex<VecDeque<Suggestion>>,
    pub related_pool: Vec<String>,
    /// When set, each related request waits for one permit
    pub related_gate: Option<Arc<Semaphore>>,
    pub fail_related_after: Option<usize>,
    /// Per-call gates for `fetch_movies`, consumed in call order
    pub fetch_gates: Mutex<VecDeque<Arc<Semaphore>>>,
    /// When set, each suggest call waits for one permit
    pub suggest_gate: Option<Arc<Semaphore>>,
    pub related_requests: Mutex<Vec<Vec<String>>>,
    pub suggest_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub added: Mutex<Vec<(CollectionName, NewMovie)>>,
}

fn rejected(operation: &'static str, status: u16, detail: &str) -> AppError {
    AppError::RemoteOperationFailed {
        operation,
        status,
        detail: detail.to_string(),
    }
}

/// Waits for and consumes one permit
async fn pass(gate: &Semaphore) -> AppResult<()> {
    gate.acquire()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .forget();
    Ok(())
}

impl InMemoryBackend {
    pub fn with_collections(collections: Collections) -> Self {
        Self {
            collections: Mutex::new(collections),
            ..Default::default()
        }
    }

    pub fn queue_suggestions(&self, titles: &[&str]) {
        let mut queue = self.suggestions.lock().unwrap();
        for title in titles {
            queue.push_back(Suggestion {
                title: title.to_string(),
                keywords: vec!["drama".to_string()],
                description: format!("About {}", title),
                ..Default::default()
            });
        }
    }

    pub fn related_request_count(&self) -> usize {
        self.related_requests.lock().unwrap().len()
    }
}

fn bucket_mut(collections: &mut Collections, name: CollectionName) -> &mut Vec<Movie> {
    match name {
        CollectionName::Watched => &mut collections.watched,
        CollectionName::WantToWatch => &mut collections.want_to_watch,
        CollectionName::NotInterested => &mut collections.not_interested,
        CollectionName::Undecided => &mut collections.undecided,
    }
}

pub fn movie(title: &str, added_date: &str) -> Movie {
    Movie {
        title: title.to_string(),
        added_date: Some(added_date.to_string()),
        ..Default::default()
    }
}

pub fn related_titles(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Related {:02}", i)).collect()
}

#[async_trait::async_trait]
impl MovieBackend for InMemoryBackend {
    async fn fetch_movies(&self) -> AppResult<MoviesResponse> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        // Snapshot at request time, answer when the gate opens
        let response = MoviesResponse {
            collections: self.collections.lock().unwrap().clone(),
            preferences: self.preferences.lock().unwrap().clone(),
        };
        let gate = self.fetch_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            pass(&gate).await?;
        }
        Ok(response)
    }

    async fn fetch_genres(&self) -> AppResult<Vec<String>> {
        Ok(vec!["drama".to_string(), "sci-fi".to_string()])
    }

    async fn fetch_keyword_analysis(&self) -> AppResult<KeywordAnalysis> {
        Ok(KeywordAnalysis::default())
    }

    async fn add_movie(&self, collection: CollectionName, movie: &NewMovie) -> AppResult<()> {
        let mut collections = self.collections.lock().unwrap();
        if collections.find(&movie.title).is_some() {
            return Err(rejected("add_movie", 400, "Movie already exists in a list"));
        }
        if collection == CollectionName::Watched && movie.score.is_none() {
            return Err(rejected("add_movie", 400, "Score is required for watched movies"));
        }

        bucket_mut(&mut collections, collection).push(Movie {
            title: movie.title.clone(),
            score: movie.score,
            added_date: Some(ADDED_DATE.to_string()),
            keywords: movie.keywords.clone(),
            description: movie.description.clone(),
            credits: movie.credits.clone(),
            ..Default::default()
        });
        self.added.lock().unwrap().push((collection, movie.clone()));
        Ok(())
    }

    async fn move_movie(&self, request: &MoveRequest) -> AppResult<()> {
        let mut collections = self.collections.lock().unwrap();
        let (from, _) = collections
            .find(&request.title)
            .ok_or_else(|| rejected("move_movie", 404, "Movie not found"))?;
        if request.new_list == CollectionName::Watched && request.new_score.is_none() {
            return Err(rejected("move_movie", 400, "Score is required for watched movies"));
        }

        let source = bucket_mut(&mut collections, from);
        let index = source
            .iter()
            .position(|m| m.title == request.title)
            .ok_or_else(|| rejected("move_movie", 404, "Movie not found"))?;
        let mut moved = source.remove(index);
        moved.score = if request.new_list == CollectionName::Watched {
            request.new_score
        } else {
            None
        };
        bucket_mut(&mut collections, request.new_list).push(moved);
        Ok(())
    }

    async fn delete_movie(&self, title: &str) -> AppResult<()> {
        let mut collections = self.collections.lock().unwrap();
        let (from, _) = collections
            .find(title)
            .ok_or_else(|| rejected("delete_movie", 404, "Movie not found"))?;
        bucket_mut(&mut collections, from).retain(|m| m.title != title);
        Ok(())
    }

    async fn update_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        *self.preferences.lock().unwrap() = Some(preferences.clone());
        Ok(())
    }

    async fn suggest(&self) -> AppResult<Suggestion> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.suggest_gate {
            pass(gate).await?;
        }
        self.suggestions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| rejected("suggest", 503, "No suggestions available"))
    }

    async fn movie_details(&self, title: &str) -> AppResult<Suggestion> {
        Ok(Suggestion {
            title: title.to_string(),
            description: format!("Details for {}", title),
            ..Default::default()
        })
    }

    async fn related_movie(
        &self,
        _title: &str,
        previous_suggestions: &[String],
    ) -> AppResult<Suggestion> {
        let request_number = {
            let mut requests = self.related_requests.lock().unwrap();
            requests.push(previous_suggestions.to_vec());
            requests.len()
        };

        if let Some(gate) = &self.related_gate {
            pass(gate).await?;
        }

        if self.fail_related_after.is_some_and(|n| request_number > n) {
            return Err(rejected("related_movie", 500, "Model unavailable"));
        }

        self.related_pool
            .iter()
            .find(|title| !previous_suggestions.contains(title))
            .map(|title| Suggestion::new(title.clone()))
            .ok_or_else(|| rejected("related_movie", 404, "No related movies left"))
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
