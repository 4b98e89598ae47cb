use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable catalog identifier for a movie
pub type MovieId = i64;

/// Catalog identifier for a genre
pub type GenreId = i64;

/// A search or discovery hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
}

impl MovieSummary {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Full record returned by the catalog's detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Average vote on a 0-10 scale
    #[serde(default, alias = "vote_average")]
    pub rating: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieDetail {
    pub fn genre_ids(&self) -> BTreeSet<GenreId> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }
}

/// Envelope shared by the catalog's search and discover endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}
