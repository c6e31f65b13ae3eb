use crate::{
    models::Movie,
    services::projection::{project, ProjectionConfig},
};

/// Items revealed initially and per `advance`
pub const PAGE_SIZE: usize = 20;

/// Incremental reveal over a projected collection
///
/// The reveal count only grows through `advance` and drops back to one page
/// whenever the projection config changes. A reload of the underlying
/// movies re-projects without resetting it.
#[derive(Debug, Clone)]
pub struct PaginatedView {
    config: ProjectionConfig,
    projected: Vec<Movie>,
    reveal_count: usize,
}

impl PaginatedView {
    pub fn new(movies: &[Movie], config: ProjectionConfig) -> Self {
        let projected = project(movies, &config);
        Self {
            config,
            projected,
            reveal_count: PAGE_SIZE,
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Applies a new config; a changed config resets the reveal count
    pub fn set_config(&mut self, movies: &[Movie], config: ProjectionConfig) {
        if config != self.config {
            tracing::debug!(?config, "Projection config changed, resetting reveal count");
            self.config = config;
            self.reveal_count = PAGE_SIZE;
        }
        self.projected = project(movies, &self.config);
    }

    /// Re-projects after the collection itself changed
    pub fn refresh(&mut self, movies: &[Movie]) {
        self.projected = project(movies, &self.config);
    }

    /// Reveals another page, never past the end of the projection
    pub fn advance(&mut self) {
        if self.has_more() {
            self.reveal_count = (self.reveal_count + PAGE_SIZE).min(self.projected.len());
        }
    }

    /// Number of items currently revealed
    pub fn reveal_count(&self) -> usize {
        self.reveal_count.min(self.projected.len())
    }

    pub fn visible(&self) -> &[Movie] {
        &self.projected[..self.reveal_count()]
    }

    pub fn has_more(&self) -> bool {
        self.reveal_count < self.projected.len()
    }

    /// Full projected length, revealed or not
    pub fn len(&self) -> usize {
        self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projected.is_empty()
    }
}
