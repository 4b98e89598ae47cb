//! TMDB catalog client
//!
//! Endpoints used:
//! 1. Title search: `/search/movie`
//! 2. Details: `/movie/{id}`
//! 3. Genre discovery: `/discover/movie`, sorted by popularity
use std::collections::BTreeSet;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    catalog::MovieCatalog,
    error::{AppError, AppResult},
    models::{CatalogPage, GenreId, MovieDetail, MovieId, MovieSummary},
};

const DISCOVER_SORT: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a GET and decodes the body.
    ///
    /// Returns `Ok(None)` on a non-success status so callers can treat it as
    /// absence. Transport failures and undecodable bodies propagate.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                path = %path,
                status = %status,
                body = %body,
                "Catalog returned non-success status, treating as empty"
            );
            return Ok(None);
        }

        let body = response.text().await?;
        let decoded = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(path = %path, error = %e, body = %body, "Failed to decode catalog response");
            AppError::ExternalApi(format!("Failed to parse catalog response: {}", e))
        })?;

        Ok(Some(decoded))
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, query: &str, include_adult: bool) -> AppResult<Vec<MovieSummary>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let page: Option<CatalogPage> = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("include_adult", include_adult.to_string()),
                ],
            )
            .await?;
        let movies = page.map(|p| p.results).unwrap_or_default();

        tracing::info!(
            query = %query,
            results = movies.len(),
            catalog = self.name(),
            "Title search completed"
        );

        Ok(movies)
    }

    async fn fetch_detail(&self, id: MovieId) -> AppResult<Option<MovieDetail>> {
        let detail: Option<MovieDetail> = self.get_json(&format!("/movie/{}", id), &[]).await?;

        tracing::debug!(movie_id = id, found = detail.is_some(), "Movie detail fetched");

        Ok(detail)
    }

    async fn discover_by_genre(
        &self,
        genre_ids: &BTreeSet<GenreId>,
        original_language: &str,
        include_adult: bool,
    ) -> AppResult<Vec<MovieSummary>> {
        if genre_ids.is_empty() {
            return Ok(Vec::new());
        }

        let with_genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let page: Option<CatalogPage> = self
            .get_json(
                "/discover/movie",
                &[
                    ("with_genres", with_genres.clone()),
                    ("with_original_language", original_language.to_string()),
                    ("sort_by", DISCOVER_SORT.to_string()),
                    ("include_adult", include_adult.to_string()),
                ],
            )
            .await?;
        let movies = page.map(|p| p.results).unwrap_or_default();

        tracing::info!(
            genres = %with_genres,
            language = %original_language,
            results = movies.len(),
            catalog = self.name(),
            "Genre discovery completed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
