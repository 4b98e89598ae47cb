//! Movie catalog abstraction
//!
//! Read-only access to an external movie metadata service. Non-success
//! responses from the service are reported as "no results" rather than as
//! errors; only transport failures surface as `Err`.

use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{GenreId, MovieDetail, MovieId, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by title.
    ///
    /// An empty query yields no results without contacting the service.
    async fn search(&self, query: &str, include_adult: bool) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the full record for one movie, `None` when the service has no record
    async fn fetch_detail(&self, id: MovieId) -> AppResult<Option<MovieDetail>>;

    /// Movies matching all of `genre_ids`, most popular first.
    ///
    /// An empty genre set yields no results without contacting the service.
    async fn discover_by_genre(
        &self,
        genre_ids: &BTreeSet<GenreId>,
        original_language: &str,
        include_adult: bool,
    ) -> AppResult<Vec<MovieSummary>>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}
