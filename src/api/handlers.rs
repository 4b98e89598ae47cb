use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieId, MovieView, SearchOutcome, UserRecord},
    services::{render_movie, resolve_title},
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub include_adult: bool,
}

#[derive(Debug, Deserialize)]
pub struct MovieParams {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub include_adult: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddExclusionRequest {
    pub movie_id: MovieId,
}

fn require_user_id(user_id: &str) -> AppResult<&str> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User ID cannot be empty".to_string()));
    }
    Ok(user_id)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Resolve typed text to catalog matches or first-letter suggestions
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchOutcome>> {
    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        include_adult = params.include_adult,
        "Processing movie search"
    );

    let outcome = resolve_title(state.catalog.as_ref(), &params.q, params.include_adult).await?;
    Ok(Json(outcome))
}

/// Movie details plus genre-matched recommendations
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<MovieId>,
    Query(params): Query<MovieParams>,
) -> AppResult<Json<MovieView>> {
    tracing::info!(
        request_id = %request_id,
        movie_id = movie_id,
        user_id = params.user_id.as_deref().unwrap_or(""),
        "Rendering movie"
    );

    let view = render_movie(
        state.catalog.as_ref(),
        state.store.as_ref(),
        &state.view,
        movie_id,
        params.user_id.as_deref(),
        params.include_adult,
    )
    .await?;

    Ok(Json(view))
}

/// Whole user record; an unknown user reads as an empty record
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserRecord>> {
    let user_id = require_user_id(&user_id)?;
    let record = state.store.get_record(user_id).await?.unwrap_or(UserRecord {
        created_at: None,
        ..UserRecord::new(user_id)
    });
    Ok(Json(record))
}

pub async fn get_exclusions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<MovieId>>> {
    let user_id = require_user_id(&user_id)?;
    let excluded = state.store.get_excluded(user_id).await?;
    Ok(Json(excluded.into_iter().collect()))
}

/// Hide a movie from this user's future recommendations
pub async fn add_exclusion(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Json(request): Json<AddExclusionRequest>,
) -> AppResult<Json<Vec<MovieId>>> {
    let user_id = require_user_id(&user_id)?;

    state.store.add_exclusion(user_id, request.movie_id).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        movie_id = request.movie_id,
        "Movie excluded from recommendations"
    );

    let excluded = state.store.get_excluded(user_id).await?;
    Ok(Json(excluded.into_iter().collect()))
}
