use rand::{seq::SliceRandom, Rng};
use std::collections::BTreeSet;

use crate::{
    catalog::MovieCatalog,
    error::AppResult,
    models::{GenreId, MovieId, MovieSummary},
    store::UserStore,
};

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Proposes up to five genre-matched alternatives to a movie.
///
/// ## Algorithm
/// 1. Discover movies sharing `genre_ids` in the same original language
/// 2. Drop the viewed movie and anything the user has excluded
/// 3. Uniformly shuffle what remains and keep the first five
///
/// The catalog's popularity order does not survive the shuffle: the result
/// is a random sample of eligible candidates, not a ranking.
///
/// A blank `user_id` is treated as a user with no exclusions.
pub async fn recommend(
    catalog: &dyn MovieCatalog,
    store: &dyn UserStore,
    genre_ids: &BTreeSet<GenreId>,
    exclude_id: MovieId,
    original_language: &str,
    user_id: &str,
    include_adult: bool,
) -> AppResult<Vec<MovieSummary>> {
    if genre_ids.is_empty() {
        return Ok(Vec::new());
    }

    let excluded = if user_id.trim().is_empty() {
        BTreeSet::new()
    } else {
        store.get_excluded(user_id).await?
    };

    let candidates = catalog
        .discover_by_genre(genre_ids, original_language, include_adult)
        .await?;
    let candidate_count = candidates.len();

    let picks = select_candidates(candidates, &excluded, exclude_id, &mut rand::rng());

    tracing::info!(
        user_id = %user_id,
        movie_id = exclude_id,
        candidates = candidate_count,
        excluded = excluded.len(),
        picked = picks.len(),
        "Recommendations selected"
    );

    Ok(picks)
}

/// Filters out `exclude_id` and `excluded`, then samples up to
/// [`MAX_RECOMMENDATIONS`] of the rest in random order.
pub fn select_candidates<R: Rng + ?Sized>(
    candidates: Vec<MovieSummary>,
    excluded: &BTreeSet<MovieId>,
    exclude_id: MovieId,
    rng: &mut R,
) -> Vec<MovieSummary> {
    let mut eligible: Vec<MovieSummary> = candidates
        .into_iter()
        .filter(|movie| movie.id != exclude_id && !excluded.contains(&movie.id))
        .collect();

    eligible.shuffle(rng);
    eligible.truncate(MAX_RECOMMENDATIONS);
    eligible
}
