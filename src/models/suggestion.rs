use serde::{Deserialize, Serialize};

use super::{CollectionName, Credits, Movie, NewMovie};

/// An AI-produced recommendation that is not persisted until promoted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credits: Credits,
    /// Whether the title already lives in one of the collections
    #[serde(default)]
    pub is_in_list: bool,
    /// Owning collection when `is_in_list` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<CollectionName>,
    /// Reached by browsing related movies rather than the top-level suggest flow
    #[serde(default)]
    pub from_recommendation: bool,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Records which collection (if any) owns this title
    pub fn classify(&mut self, owner: Option<CollectionName>) {
        self.is_in_list = owner.is_some();
        self.list_name = owner;
    }

    /// Body for promoting this suggestion into a collection
    pub fn to_new_movie(&self, score: Option<u8>) -> NewMovie {
        NewMovie {
            title: self.title.clone(),
            score,
            keywords: self.keywords.clone(),
            description: Some(self.description.clone()),
            credits: Some(self.credits.clone()),
        }
    }
}

/// What the presenting surface is showing
///
/// An owned movie carries its collection as data instead of being told
/// apart from a suggestion by the presence of a score.
#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    Owned {
        movie: Movie,
        collection: CollectionName,
    },
    Suggested(Suggestion),
}

impl Presented {
    pub fn title(&self) -> &str {
        match self {
            Presented::Owned { movie, .. } => &movie.title,
            Presented::Suggested(suggestion) => &suggestion.title,
        }
    }

    pub fn is_in_list(&self) -> bool {
        match self {
            Presented::Owned { .. } => true,
            Presented::Suggested(suggestion) => suggestion.is_in_list,
        }
    }

    pub fn owning_collection(&self) -> Option<CollectionName> {
        match self {
            Presented::Owned { collection, .. } => Some(*collection),
            Presented::Suggested(suggestion) => suggestion.list_name,
        }
    }

    pub fn as_suggestion(&self) -> Option<&Suggestion> {
        match self {
            Presented::Suggested(suggestion) => Some(suggestion),
            Presented::Owned { .. } => None,
        }
    }
}
