use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User taste preferences, edited locally and pushed wholesale on save
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl Preferences {
    /// Adds a genre unless already present
    pub fn add_genre(&mut self, genre: impl Into<String>) {
        let genre = genre.into();
        if !self.genres.contains(&genre) {
            self.genres.push(genre);
        }
    }

    /// Adds a keyword unless already present
    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }

    pub fn remove_keyword(&mut self, keyword: &str) {
        self.keywords.retain(|k| k != keyword);
    }
}

/// Keyword statistics derived server-side from rated movies
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeywordAnalysis {
    #[serde(default)]
    pub liked: BTreeMap<String, u32>,
    #[serde(default)]
    pub disliked: BTreeMap<String, u32>,
}

impl KeywordAnalysis {
    /// All keywords ordered by count, most frequent first
    ///
    /// A keyword that is both liked and disliked takes its disliked count.
    /// Equal counts keep alphabetical order.
    pub fn sorted_keywords(&self) -> Vec<String> {
        let mut merged = self.liked.clone();
        merged.extend(self.disliked.iter().map(|(k, v)| (k.clone(), *v)));

        let mut entries: Vec<(String, u32)> = merged.into_iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.cmp(a));
        entries.into_iter().map(|(keyword, _)| keyword).collect()
    }
}

/// Response from GET /genres
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenresResponse {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub genres: Vec<String>,
}
