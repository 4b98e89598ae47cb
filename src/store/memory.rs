use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{MovieId, SearchedMovie, UserRecord},
    store::UserStore,
};

/// Process-local user store.
///
/// Used when no Redis URL is configured, and in tests. Records do not
/// survive a restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    records: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_excluded(&self, user_id: &str) -> AppResult<BTreeSet<MovieId>> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|r| r.excluded_movies.clone())
            .unwrap_or_default())
    }

    async fn append_search(&self, user_id: &str, entry: SearchedMovie) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord::new(user_id))
            .add_search(entry);
        Ok(())
    }

    async fn add_exclusion(&self, user_id: &str, movie_id: MovieId) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord::new(user_id))
            .add_exclusion(movie_id);
        Ok(())
    }

    async fn get_record(&self, user_id: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
