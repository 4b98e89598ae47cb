use crate::{
    catalog::MovieCatalog,
    config::Config,
    error::{AppError, AppResult},
    models::{MovieCard, MovieId, MovieView, SearchedMovie},
    services::recommendations,
    store::UserStore,
};

/// Display settings shared by every rendered movie
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub image_url: String,
    pub default_language: String,
}

impl From<&Config> for ViewSettings {
    fn from(config: &Config) -> Self {
        Self {
            image_url: config.tmdb_image_url.clone(),
            default_language: config.default_language.clone(),
        }
    }
}

/// Renders a chosen movie and its recommendations.
///
/// Both a direct search hit and an accepted suggestion end up here. The
/// movie is recorded in the user's search history, then each recommended
/// movie's details are fetched one after another; recommendations whose
/// details are unavailable are left out.
pub async fn render_movie(
    catalog: &dyn MovieCatalog,
    store: &dyn UserStore,
    settings: &ViewSettings,
    movie_id: MovieId,
    user_id: Option<&str>,
    include_adult: bool,
) -> AppResult<MovieView> {
    let detail = catalog
        .fetch_detail(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))?;

    let user_id = user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_default();
    if !user_id.is_empty() {
        store
            .append_search(user_id, SearchedMovie::from(&detail))
            .await?;
    }

    let language = detail
        .original_language
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or(settings.default_language.as_str());

    let picks = recommendations::recommend(
        catalog,
        store,
        &detail.genre_ids(),
        detail.id,
        language,
        user_id,
        include_adult,
    )
    .await?;

    let mut cards = Vec::with_capacity(picks.len());
    for pick in picks {
        match catalog.fetch_detail(pick.id).await? {
            Some(rec) => cards.push(MovieCard::from_detail(&rec, &settings.image_url)),
            None => tracing::debug!(movie_id = pick.id, "Skipping recommendation without details"),
        }
    }

    Ok(MovieView {
        movie: MovieCard::from_detail(&detail, &settings.image_url),
        recommendations: cards,
    })
}
