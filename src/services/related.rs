use std::{
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::Stream;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{models::Suggestion, services::backend::MovieBackend};

/// Most related titles produced for one seed
pub const RELATED_LIMIT: usize = 10;

/// Why an expansion stopped producing items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionEnd {
    /// Reached the item limit
    Completed,
    /// A request failed or repeated a title; earlier items stand
    Truncated,
    /// Torn down before the limit
    Cancelled,
}

/// Sequential, exclusion-aware discovery of titles related to a seed
///
/// A background task issues one request at a time, each carrying the seed
/// and every title yielded so far, and forwards results as they resolve.
/// Dropping the expansion cancels it: an in-flight result is discarded and
/// no further request is issued. Failures end the sequence quietly.
pub struct RelatedExpansion {
    seed: String,
    receiver: mpsc::Receiver<Suggestion>,
    token: CancellationToken,
    task: Option<JoinHandle<ExpansionEnd>>,
}

impl RelatedExpansion {
    pub fn start(backend: Arc<dyn MovieBackend>, seed: impl Into<String>) -> Self {
        Self::with_limit(backend, seed, RELATED_LIMIT)
    }

    /// Starts an expansion producing at most `limit` items (capped at 10)
    pub fn with_limit(backend: Arc<dyn MovieBackend>, seed: impl Into<String>, limit: usize) -> Self {
        let seed = seed.into();
        let limit = limit.min(RELATED_LIMIT);
        let token = CancellationToken::new();
        let (tx, receiver) = mpsc::channel(RELATED_LIMIT);

        tracing::info!(seed = %seed, limit, "Starting related expansion");

        let task = tokio::spawn(Self::expansion_task(
            backend,
            seed.clone(),
            limit,
            token.clone(),
            tx,
        ));

        Self {
            seed,
            receiver,
            token,
            task: Some(task),
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Next related title, or `None` once the expansion has ended
    pub async fn next(&mut self) -> Option<Suggestion> {
        self.receiver.recv().await
    }

    /// Stops the expansion; items already received stay valid
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!(seed = %self.seed, "Cancelling related expansion");
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the background task and reports how it ended
    pub async fn finish(mut self) -> ExpansionEnd {
        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                tracing::error!(error = %e, "Related expansion task failed");
                ExpansionEnd::Truncated
            }),
            None => ExpansionEnd::Cancelled,
        }
    }

    /// Background task: one suspension point per round trip
    async fn expansion_task(
        backend: Arc<dyn MovieBackend>,
        seed: String,
        limit: usize,
        token: CancellationToken,
        tx: mpsc::Sender<Suggestion>,
    ) -> ExpansionEnd {
        let mut exclusions = vec![seed.clone()];

        while exclusions.len() - 1 < limit {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(seed = %seed, yielded = exclusions.len() - 1, "Related expansion cancelled");
                    return ExpansionEnd::Cancelled;
                }
                result = backend.related_movie(&seed, &exclusions) => result,
            };

            // Liveness check on arrival
            if token.is_cancelled() {
                return ExpansionEnd::Cancelled;
            }

            let suggestion = match result {
                Ok(suggestion) => suggestion,
                Err(e) => {
                    tracing::warn!(
                        seed = %seed,
                        yielded = exclusions.len() - 1,
                        error = %e,
                        "Related expansion truncated"
                    );
                    return ExpansionEnd::Truncated;
                }
            };

            if exclusions.contains(&suggestion.title) {
                tracing::warn!(
                    seed = %seed,
                    title = %suggestion.title,
                    "Backend repeated an excluded title, truncating"
                );
                return ExpansionEnd::Truncated;
            }

            exclusions.push(suggestion.title.clone());
            tracing::debug!(seed = %seed, title = %suggestion.title, "Related title received");

            if tx.send(suggestion).await.is_err() {
                return ExpansionEnd::Cancelled;
            }
        }

        tracing::info!(seed = %seed, yielded = limit, "Related expansion completed");
        ExpansionEnd::Completed
    }
}

impl Drop for RelatedExpansion {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Stream for RelatedExpansion {
    type Item = Suggestion;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Suggestion>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Related-movies panel state for whichever title is on screen
///
/// Holds the running expansion for the current seed and the items received
/// so far. Focusing another seed tears down the old expansion first.
pub struct RelatedBrowser {
    backend: Arc<dyn MovieBackend>,
    current: Option<RelatedExpansion>,
    items: Vec<Suggestion>,
    loading: bool,
}

impl RelatedBrowser {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self {
            backend,
            current: None,
            items: Vec::new(),
            loading: false,
        }
    }

    /// Points the panel at `seed`; returns true when a new expansion started
    pub fn focus(&mut self, seed: &str) -> bool {
        if self.seed() == Some(seed) {
            return false;
        }

        self.teardown();
        self.current = Some(RelatedExpansion::start(self.backend.clone(), seed));
        self.loading = true;
        true
    }

    /// Waits for the next related title of the current seed
    pub async fn next(&mut self) -> Option<&Suggestion> {
        let expansion = self.current.as_mut()?;
        match expansion.next().await {
            Some(suggestion) => {
                self.items.push(suggestion);
                self.items.last()
            }
            None => {
                self.loading = false;
                None
            }
        }
    }

    /// Drains the current expansion to its end
    pub async fn fill(&mut self) -> &[Suggestion] {
        while self.next().await.is_some() {}
        &self.items
    }

    /// Cancels the current expansion and forgets its items
    pub fn teardown(&mut self) {
        if let Some(expansion) = self.current.take() {
            expansion.cancel();
        }
        self.items.clear();
        self.loading = false;
    }

    pub fn seed(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.seed())
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    /// True while the current expansion may still produce items
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
