use serde::{Deserialize, Serialize};

use super::{MovieDetail, MovieId, MovieSummary};

const MISSING: &str = "N/A";
const POSTER_SIZE: &str = "w500";

/// A movie detail prepared for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    pub id: MovieId,
    pub title: String,
    pub release_date: String,
    pub overview: String,
    pub rating: f64,
    pub original_language: Option<String>,
    pub genres: Vec<String>,
    /// Comma-joined genre names
    pub genre_names: String,
    pub poster_url: Option<String>,
}

impl MovieCard {
    pub fn from_detail(detail: &MovieDetail, image_url: &str) -> Self {
        let genres = detail.genre_names();
        let poster_url = detail
            .poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}/{}{}", image_url.trim_end_matches('/'), POSTER_SIZE, p));

        Self {
            id: detail.id,
            title: detail.title.clone(),
            release_date: non_empty_or_missing(detail.release_date.as_deref()),
            overview: non_empty_or_missing(detail.overview.as_deref()),
            rating: detail.rating,
            original_language: detail.original_language.clone(),
            genre_names: genres.join(", "),
            genres,
            poster_url,
        }
    }
}

fn non_empty_or_missing(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

/// A resolved movie with its genre-matched alternatives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieView {
    pub movie: MovieCard,
    pub recommendations: Vec<MovieCard>,
}

/// Result of resolving a typed title against the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The catalog search matched the query
    Matches { movies: Vec<MovieSummary> },
    /// Nothing matched; these titles share the query's first letter
    Suggestions {
        letter: String,
        movies: Vec<MovieSummary>,
    },
    NoMatch,
}
