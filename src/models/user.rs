use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{MovieDetail, MovieId};

/// One entry of a user's search history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchedMovie {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
}

impl From<&MovieDetail> for SearchedMovie {
    fn from(detail: &MovieDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            genres: detail.genre_names(),
        }
    }
}

/// Persisted per-user state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub user_id: String,
    pub searched_movies: Vec<SearchedMovie>,
    /// Only ever grows; there is no removal path.
    pub excluded_movies: BTreeSet<MovieId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Creates an empty record, as written on a user's first mutation
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            searched_movies: Vec::new(),
            excluded_movies: BTreeSet::new(),
            created_at: Some(Utc::now()),
        }
    }

    /// Unions an entry into the history by value
    pub fn add_search(&mut self, entry: SearchedMovie) {
        if !self.searched_movies.contains(&entry) {
            self.searched_movies.push(entry);
        }
    }

    pub fn add_exclusion(&mut self, movie_id: MovieId) {
        self.excluded_movies.insert(movie_id);
    }
}
