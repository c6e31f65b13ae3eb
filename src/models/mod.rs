use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod preferences;
pub mod suggestion;

pub use preferences::{GenresResponse, KeywordAnalysis, Preferences};
pub use suggestion::{Presented, Suggestion};

/// Decodes an explicit `null` list as empty
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lowest and highest score a watched movie may carry
pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 10;

/// Score used when a movie is added to `watched` without one
pub const DEFAULT_WATCHED_SCORE: u8 = 5;

/// One of the four mutually exclusive buckets a movie can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionName {
    Watched,
    WantToWatch,
    NotInterested,
    Undecided,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [
        CollectionName::Watched,
        CollectionName::WantToWatch,
        CollectionName::NotInterested,
        CollectionName::Undecided,
    ];

    /// Wire name used in URLs and JSON bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Watched => "watched",
            CollectionName::WantToWatch => "want_to_watch",
            CollectionName::NotInterested => "not_interested",
            CollectionName::Undecided => "undecided",
        }
    }

    /// Only the watched collection keeps scores
    pub fn keeps_score(&self) -> bool {
        matches!(self, CollectionName::Watched)
    }
}

impl Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid list name: {}", s)))
    }
}

/// People credited on a movie, in billing order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cast: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub writers: Vec<String>,
}

/// A movie persisted in one of the collections
///
/// The title is the identity key across the whole system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_watched: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}

impl Movie {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// `added_date` as a unix timestamp
    ///
    /// Accepts the backend's `YYYY-MM-DD` form as well as RFC 3339.
    pub fn added_timestamp(&self) -> Option<i64> {
        let raw = self.added_date.as_deref()?.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.timestamp())
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

/// Snapshot of all four collections
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Collections {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub watched: Vec<Movie>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub want_to_watch: Vec<Movie>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub not_interested: Vec<Movie>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub undecided: Vec<Movie>,
}

impl Collections {
    pub fn get(&self, name: CollectionName) -> &[Movie] {
        match name {
            CollectionName::Watched => &self.watched,
            CollectionName::WantToWatch => &self.want_to_watch,
            CollectionName::NotInterested => &self.not_interested,
            CollectionName::Undecided => &self.undecided,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollectionName, &[Movie])> + '_ {
        CollectionName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    /// Exact, case-sensitive title lookup across all collections
    pub fn find(&self, title: &str) -> Option<(CollectionName, &Movie)> {
        self.iter().find_map(|(name, movies)| {
            movies
                .iter()
                .find(|movie| movie.title == title)
                .map(|movie| (name, movie))
        })
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, movies)| movies.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Titles present more than once across the snapshot
    ///
    /// Empty for any snapshot produced by a well-behaved backend.
    pub fn duplicate_titles(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for (_, movies) in self.iter() {
            for movie in movies {
                if !seen.insert(movie.title.as_str()) && !duplicates.contains(&movie.title) {
                    duplicates.push(movie.title.clone());
                }
            }
        }
        duplicates
    }
}

/// Response from GET /movies
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MoviesResponse {
    #[serde(flatten)]
    pub collections: Collections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

/// Body for POST /movies/{collection}
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMovie {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}

/// Body for PUT /movies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveRequest {
    pub title: String,
    pub new_list: CollectionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_score: Option<u8>,
}

/// Body for POST /movies/related/{title}
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelatedRequest {
    pub previous_suggestions: Vec<String>,
}
