use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Movie;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Date,
    Score,
}

impl SortKey {
    /// Direction applied when switching to this key from another one
    pub fn initial_direction(&self) -> SortDirection {
        match self {
            SortKey::Title => SortDirection::Asc,
            SortKey::Date | SortKey::Score => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Search, filter and sort settings for one collection view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub search_text: String,
    /// Exact keyword a movie must carry; empty disables the filter
    pub genre_filter: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ProjectionConfig {
    /// Selecting the active key flips direction; another key starts at its default
    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = key.initial_direction();
        }
    }
}

/// Filters and sorts `movies` for display
///
/// A movie matches when the search text is a case-insensitive substring of
/// its title, description or any keyword, and (with a genre filter set) its
/// keywords contain the genre exactly. The sort is stable; ties keep input
/// order in both directions.
pub fn project(movies: &[Movie], config: &ProjectionConfig) -> Vec<Movie> {
    let needle = config.search_text.to_lowercase();

    let mut projected: Vec<Movie> = movies
        .iter()
        .filter(|movie| matches_search(movie, &needle) && matches_genre(movie, &config.genre_filter))
        .cloned()
        .collect();

    projected.sort_by(|a, b| {
        let ordering = compare(a, b, config.sort_key);
        match config.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    projected
}

fn matches_search(movie: &Movie, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    movie.title.to_lowercase().contains(needle)
        || movie
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || movie
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(needle))
}

fn matches_genre(movie: &Movie, genre: &str) -> bool {
    genre.is_empty() || movie.has_keyword(genre)
}

fn compare(a: &Movie, b: &Movie, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.cmp(&b.title),
        // Unparseable or missing dates sort as the oldest
        SortKey::Date => a.added_timestamp().cmp(&b.added_timestamp()),
        SortKey::Score => a.score.unwrap_or(0).cmp(&b.score.unwrap_or(0)),
    }
}
