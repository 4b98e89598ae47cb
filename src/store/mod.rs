//! Per-user persisted state
//!
//! Records are keyed by a free-text user id and created lazily on the first
//! write. All mutations are unions, so concurrent writers for the same user
//! never remove each other's entries.

use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{MovieId, SearchedMovie, UserRecord},
};

pub mod memory;
pub mod redis;

pub use self::memory::InMemoryUserStore;
pub use self::redis::RedisUserStore;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Movies the user has hidden from recommendations; empty for unknown users
    async fn get_excluded(&self, user_id: &str) -> AppResult<BTreeSet<MovieId>>;

    /// Unions an entry into the user's search history.
    ///
    /// Byte-identical entries collapse; entries sharing an id but differing in
    /// title or genres are kept side by side.
    async fn append_search(&self, user_id: &str, entry: SearchedMovie) -> AppResult<()>;

    /// Unions a movie into the user's exclusion set
    async fn add_exclusion(&self, user_id: &str, movie_id: MovieId) -> AppResult<()>;

    /// The whole record, `None` if the user has never written anything
    async fn get_record(&self, user_id: &str) -> AppResult<Option<UserRecord>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
