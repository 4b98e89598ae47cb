use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Client, Cmd, Pipeline};

use crate::{
    error::AppResult,
    models::{MovieId, SearchedMovie, UserRecord},
    store::UserStore,
};

const CREATED_AT_FIELD: &str = "created_at";

/// Adds ARGV[2] to the history sorted set unless already present, scored by a
/// per-user counter so reads come back in first-insertion order.
///
/// KEYS[1] record hash, KEYS[2] history zset, ARGV[1] creation time, ARGV[2] entry
const APPEND_HISTORY_SCRIPT: &str = r#"
redis.call('HSETNX', KEYS[1], 'created_at', ARGV[1])
if redis.call('ZSCORE', KEYS[2], ARGV[2]) then
    return 0
end
local seq = redis.call('HINCRBY', KEYS[1], 'search_seq', 1)
return redis.call('ZADD', KEYS[2], 'NX', seq, ARGV[2])
"#;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Hash holding record metadata; its presence marks the record as existing
    Record(String),
    /// Set of excluded movie ids
    Excluded(String),
    /// Sorted set of JSON-encoded search history entries, scored by insertion
    Searched(String),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Record(user_id) => write!(f, "user:{}", user_id),
            StoreKey::Excluded(user_id) => write!(f, "user:{}:excluded", user_id),
            StoreKey::Searched(user_id) => write!(f, "user:{}:searched", user_id),
        }
    }
}

/// Creates a Redis client for the user store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// `HSETNX` the record then `SADD` the movie, in one transaction
fn exclusion_pipeline(user_id: &str, movie_id: MovieId, created_at: &str) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .hset_nx(
            StoreKey::Record(user_id.to_string()).to_string(),
            CREATED_AT_FIELD,
            created_at,
        )
        .ignore()
        .sadd(StoreKey::Excluded(user_id.to_string()).to_string(), movie_id)
        .ignore();
    pipe
}

/// `EVAL` of [`APPEND_HISTORY_SCRIPT`] for one encoded entry
fn append_history_cmd(user_id: &str, entry_json: &str, created_at: &str) -> Cmd {
    let mut cmd = redis::cmd("EVAL");
    cmd.arg(APPEND_HISTORY_SCRIPT)
        .arg(2)
        .arg(StoreKey::Record(user_id.to_string()).to_string())
        .arg(StoreKey::Searched(user_id.to_string()).to_string())
        .arg(created_at)
        .arg(entry_json);
    cmd
}

/// User store backed by Redis.
///
/// Exclusions are a set and history is a sorted set keyed by first insertion,
/// so both union by value and concurrent writers never drop each other's
/// entries.
#[derive(Clone)]
pub struct RedisUserStore {
    conn: ConnectionManager,
}

impl RedisUserStore {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = create_redis_client(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

fn parse_history(raw: Vec<String>) -> Vec<SearchedMovie> {
    raw.iter()
        .filter_map(|json| match serde_json::from_str(json) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, entry = %json, "Skipping malformed search history entry");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl UserStore for RedisUserStore {
    async fn get_excluded(&self, user_id: &str) -> AppResult<BTreeSet<MovieId>> {
        let mut conn = self.conn.clone();
        let ids: Vec<MovieId> = conn
            .smembers(StoreKey::Excluded(user_id.to_string()).to_string())
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn append_search(&self, user_id: &str, entry: SearchedMovie) -> AppResult<()> {
        let json = serde_json::to_string(&entry)?;
        let mut conn = self.conn.clone();
        let _: () = append_history_cmd(user_id, &json, &Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await?;

        tracing::debug!(user_id = %user_id, movie_id = entry.id, "Search history appended");
        Ok(())
    }

    async fn add_exclusion(&self, user_id: &str, movie_id: MovieId) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = exclusion_pipeline(user_id, movie_id, &Utc::now().to_rfc3339())
            .query_async(&mut conn)
            .await?;

        tracing::debug!(user_id = %user_id, movie_id = movie_id, "Exclusion recorded");
        Ok(())
    }

    async fn get_record(&self, user_id: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.conn.clone();
        let created_at: Option<String> = conn
            .hget(StoreKey::Record(user_id.to_string()).to_string(), CREATED_AT_FIELD)
            .await?;

        let Some(created_at) = created_at else {
            return Ok(None);
        };

        let searched: Vec<String> = conn
            .zrange(StoreKey::Searched(user_id.to_string()).to_string(), 0, -1)
            .await?;
        let excluded = self.get_excluded(user_id).await?;

        Ok(Some(UserRecord {
            user_id: user_id.to_string(),
            searched_movies: parse_history(searched),
            excluded_movies: excluded,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        }))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_key_display() {
        assert_eq!(StoreKey::Record("alice".to_string()).to_string(), "user:alice");
        assert_eq!(
            StoreKey::Excluded("alice".to_string()).to_string(),
            "user:alice:excluded"
        );
        assert_eq!(
            StoreKey::Searched("alice".to_string()).to_string(),
            "user:alice:searched"
        );
    }

    fn packed(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_parse_history_keeps_insertion_order() {
        let raw = vec![
            r#"{"id":99,"title":"Zodiac","genres":["Crime"]}"#.to_string(),
            "not json".to_string(),
            r#"{"id":1,"title":"Heat","genres":["Crime"]}"#.to_string(),
        ];

        let entries = parse_history(raw);
        let ids: Vec<MovieId> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![99, 1]);
    }

    #[test]
    fn test_exclusion_pipeline_creates_record_then_unions() {
        let pipe = exclusion_pipeline("alice", 42, "2026-10-19T00:00:00+00:00");
        let commands = packed(pipe.get_packed_pipeline());

        let multi = commands.find("MULTI").unwrap();
        let hsetnx = commands.find("HSETNX").unwrap();
        let sadd = commands.find("SADD").unwrap();
        let exec = commands.find("EXEC").unwrap();
        assert!(multi < hsetnx && hsetnx < sadd && sadd < exec);

        assert!(commands.contains("$10\r\nuser:alice\r\n"));
        assert!(commands.contains("$10\r\ncreated_at\r\n"));
        assert!(commands.contains("$19\r\nuser:alice:excluded\r\n$2\r\n42\r\n"));
    }

    #[test]
    fn test_append_history_cmd_targets_sorted_set() {
        let json = r#"{"id":1,"title":"Heat","genres":["Crime"]}"#;
        let cmd = append_history_cmd("alice", json, "2026-10-19T00:00:00+00:00");
        let packed = packed(cmd.get_packed_command());

        assert!(packed.starts_with("*7\r\n$4\r\nEVAL\r\n"));
        assert!(packed.contains("\r\n$1\r\n2\r\n$10\r\nuser:alice\r\n$19\r\nuser:alice:searched\r\n"));
        assert!(packed.ends_with(&format!("${}\r\n{}\r\n", json.len(), json)));
    }

    #[test]
    fn test_append_history_script_dedups_and_orders() {
        let script = APPEND_HISTORY_SCRIPT;

        let zscore = script.find("ZSCORE").unwrap();
        let incr = script.find("HINCRBY").unwrap();
        let zadd = script.find("'ZADD', KEYS[2], 'NX', seq").unwrap();
        assert!(zscore < incr && incr < zadd);
        assert!(script.contains("'search_seq'"));
        assert!(script.contains(CREATED_AT_FIELD));
    }

    // Requires a running Redis: REDIS_URL=redis://localhost:6379 cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_round_trip_against_redis() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisUserStore::connect(&redis_url).await.unwrap();
        let user_id = format!("test-{}", uuid::Uuid::new_v4());

        assert_eq!(store.get_record(&user_id).await.unwrap(), None);

        store.add_exclusion(&user_id, 42).await.unwrap();
        store.add_exclusion(&user_id, 42).await.unwrap();
        let entry = SearchedMovie {
            id: 603,
            title: "The Matrix".to_string(),
            genres: vec!["Action".to_string()],
        };
        let earlier = SearchedMovie {
            id: 999,
            title: "Zodiac".to_string(),
            genres: vec!["Crime".to_string()],
        };
        store.append_search(&user_id, earlier.clone()).await.unwrap();
        store.append_search(&user_id, entry.clone()).await.unwrap();
        store.append_search(&user_id, entry.clone()).await.unwrap();
        store.append_search(&user_id, earlier.clone()).await.unwrap();

        let record = store.get_record(&user_id).await.unwrap().unwrap();
        assert_eq!(record.excluded_movies, BTreeSet::from([42]));
        assert_eq!(record.searched_movies, vec![earlier, entry]);
        assert!(record.created_at.is_some());

        let mut conn = store.conn.clone();
        let _: () = conn
            .del(vec![
                StoreKey::Record(user_id.clone()).to_string(),
                StoreKey::Excluded(user_id.clone()).to_string(),
                StoreKey::Searched(user_id.clone()).to_string(),
            ])
            .await
            .unwrap();
    }
}
