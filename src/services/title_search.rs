use crate::{
    catalog::MovieCatalog,
    error::AppResult,
    models::{MovieSummary, SearchOutcome},
};

pub const MAX_SUGGESTIONS: usize = 5;

/// Resolves typed text against the catalog.
///
/// A direct search is tried first. When it finds nothing, the catalog is
/// searched again with just the query's first letter and titles starting
/// with that letter are offered as suggestions.
pub async fn resolve_title(
    catalog: &dyn MovieCatalog,
    query: &str,
    include_adult: bool,
) -> AppResult<SearchOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchOutcome::Matches { movies: Vec::new() });
    }

    let movies = catalog.search(query, include_adult).await?;
    if !movies.is_empty() {
        return Ok(SearchOutcome::Matches { movies });
    }

    let Some(letter) = leading_letter(query) else {
        return Ok(SearchOutcome::NoMatch);
    };

    let movies = match_by_starting_letter(catalog, &letter, include_adult).await?;
    if movies.is_empty() {
        tracing::info!(query = %query, "No direct match and no suggestions");
        return Ok(SearchOutcome::NoMatch);
    }

    tracing::info!(
        query = %query,
        letter = %letter,
        suggestions = movies.len(),
        "No direct match, offering suggestions"
    );

    Ok(SearchOutcome::Suggestions { letter, movies })
}

/// Titles from a search for `letter` whose lower-cased form starts with it.
///
/// Keeps the catalog's relevance order and returns at most
/// [`MAX_SUGGESTIONS`].
pub async fn match_by_starting_letter(
    catalog: &dyn MovieCatalog,
    letter: &str,
    include_adult: bool,
) -> AppResult<Vec<MovieSummary>> {
    let movies = catalog.search(letter, include_adult).await?;

    Ok(movies
        .into_iter()
        .filter(|movie| movie.title.to_lowercase().starts_with(letter))
        .take(MAX_SUGGESTIONS)
        .collect())
}

/// First character of the query, lower-cased.
///
/// Some characters lower-case to more than one code point (`İ` becomes
/// `i̇`), so the whole lower-cased form is kept.
fn leading_letter(query: &str) -> Option<String> {
    query.chars().next().map(|c| c.to_lowercase().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockMovieCatalog;

    fn titles(movies: &[MovieSummary]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    fn summaries(titles: &[&str]) -> Vec<MovieSummary> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| MovieSummary::new(i as i64 + 1, *t))
            .collect()
    }

    #[tokio::test]
    async fn test_letter_match_filters_and_keeps_order() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .withf(|query, adult| query == "b" && !*adult)
            .times(1)
            .returning(|_, _| {
                Ok(summaries(&[
                    "Barbie",
                    "The Batman",
                    "Babylon",
                    "bullet train",
                    "Blade Runner",
                    "Up",
                    "Big",
                    "Brazil",
                ]))
            });

        let movies = match_by_starting_letter(&catalog, "b", false).await.unwrap();

        assert_eq!(
            titles(&movies),
            vec!["Barbie", "Babylon", "bullet train", "Blade Runner", "Big"]
        );
    }

    #[tokio::test]
    async fn test_letter_match_empty() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .returning(|_, _| Ok(summaries(&["The Batman", "A Bug's Life"])));

        let movies = match_by_starting_letter(&catalog, "b", true).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_empty_query_makes_no_call() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search().never();

        let outcome = resolve_title(&catalog, "   ", false).await.unwrap();
        assert_eq!(outcome, SearchOutcome::Matches { movies: Vec::new() });
    }

    #[tokio::test]
    async fn test_resolve_direct_match() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .withf(|query, _| query == "Heat")
            .times(1)
            .returning(|_, _| Ok(summaries(&["Heat"])));

        let outcome = resolve_title(&catalog, " Heat ", false).await.unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Matches {
                movies: summaries(&["Heat"])
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_first_letter() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .withf(|query, _| query == "Mtrix Relodd")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        catalog
            .expect_search()
            .withf(|query, _| query == "m")
            .times(1)
            .returning(|_, _| Ok(summaries(&["Moana", "The Mummy", "Matrix"])));

        let outcome = resolve_title(&catalog, "Mtrix Relodd", false).await.unwrap();

        match outcome {
            SearchOutcome::Suggestions { letter, movies } => {
                assert_eq!(letter, "m");
                assert_eq!(titles(&movies), vec!["Moana", "Matrix"]);
            }
            other => panic!("expected suggestions, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_letter_keeps_full_lowercase() {
        assert_eq!(leading_letter("Heat").as_deref(), Some("h"));
        assert_eq!(leading_letter("İstanbul").as_deref(), Some("i\u{307}"));
        assert_eq!(leading_letter(""), None);
    }

    #[tokio::test]
    async fn test_resolve_dotted_capital_i_suggestions() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .withf(|query, _| query == "İstanbl")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        catalog
            .expect_search()
            .withf(|query, _| query == "i\u{307}")
            .times(1)
            .returning(|_, _| Ok(summaries(&["İstanbul Hatırası", "Inception", "Istanbul Kırmızısı"])));

        let outcome = resolve_title(&catalog, "İstanbl", false).await.unwrap();

        match outcome {
            SearchOutcome::Suggestions { letter, movies } => {
                assert_eq!(letter, "i\u{307}");
                assert_eq!(titles(&movies), vec!["İstanbul Hatırası"]);
            }
            other => panic!("expected suggestions, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_no_match() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search().times(2).returning(|_, _| Ok(Vec::new()));

        let outcome = resolve_title(&catalog, "zzzzqx", true).await.unwrap();
        assert_eq!(outcome, SearchOutcome::NoMatch);
    }
}
