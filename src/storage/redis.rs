//! Redis-backed ranking store.
//!
//! Scores live in a sorted set (`<prefix>:scores`, member = identifier) and
//! display names in a hash (`<prefix>:names`, field = identifier). Every
//! round-trip is bounded by the configured timeout; nothing is retried.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisResult};
use tracing::{debug, warn};

use super::{RankWindow, RankingStore, StorageError};
use crate::models::{PlayerId, PlayerScore};

/// Key names for one leaderboard.
#[derive(Debug, Clone)]
pub struct RedisKeys {
    prefix: String,
}

impl RedisKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Sorted set of identifier -> score.
    pub fn scores(&self) -> String {
        format!("{}:scores", self.prefix)
    }

    /// Hash of identifier -> display name.
    pub fn names(&self) -> String {
        format!("{}:names", self.prefix)
    }
}

/// Ranking store on a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    keys: RedisKeys,
    timeout: Duration,
}

impl RedisStore {
    /// Connect to `redis_url`, failing if no connection is made within `timeout`.
    pub async fn connect(
        redis_url: &str,
        key_prefix: &str,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::open(redis_url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout)
            .set_number_of_retries(1);

        let conn = tokio::time::timeout(
            timeout,
            ConnectionManager::new_with_config(client, config),
        )
        .await
        .map_err(|_| StorageError::Unavailable(format!("no connection to {}", redis_url)))??;

        Ok(Self {
            conn,
            keys: RedisKeys::new(key_prefix),
            timeout,
        })
    }

    async fn round_trip<T, F>(&self, op: &'static str, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        bounded(self.timeout, op, fut).await
    }
}

/// Run one store round-trip, mapping expiry to `StorageError::Timeout`.
async fn bounded<T, F>(timeout: Duration, op: &'static str, fut: F) -> Result<T, StorageError>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(|e| {
            warn!("Redis {} failed: {}", op, e);
            StorageError::from(e)
        }),
        Err(_) => {
            warn!("Redis {} timed out after {:?}", op, timeout);
            Err(StorageError::Timeout(timeout))
        }
    }
}

/// Convert a sorted-set score back to the integer that was stored.
fn score_from_redis(member: &str, score: f64) -> Result<i64, StorageError> {
    if !score.is_finite() || score.fract() != 0.0 {
        return Err(StorageError::Corrupt(format!(
            "non-integer score {} for {}",
            score, member
        )));
    }
    Ok(score as i64)
}

/// Translate a rank window to `ZREVRANGE` start/stop arguments.
fn zrange_bounds(window: RankWindow) -> (isize, isize) {
    let start = isize::try_from(window.start).unwrap_or(isize::MAX);
    let stop = window
        .stop
        .map(|s| isize::try_from(s).unwrap_or(isize::MAX))
        .unwrap_or(-1);
    (start, stop)
}

#[async_trait]
impl RankingStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn upsert(&self, entry: &PlayerScore) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();

        // Score and name change together
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zadd(self.keys.scores(), entry.id.as_str(), entry.score)
            .ignore()
            .hset(self.keys.names(), entry.id.as_str(), entry.name.as_str())
            .ignore();

        let _: () = self.round_trip("upsert", pipe.query_async(&mut conn)).await?;
        debug!("Stored score {} for {}", entry.score, entry.id);
        Ok(())
    }

    async fn range_desc(&self, window: RankWindow) -> Result<Vec<(PlayerId, i64)>, StorageError> {
        let mut conn = self.conn.clone();
        let (start, stop) = zrange_bounds(window);
        let key = self.keys.scores();

        let rows: Vec<(String, f64)> = self
            .round_trip("zrevrange", conn.zrevrange_withscores(&key, start, stop))
            .await?;

        rows.into_iter()
            .map(|(member, score)| {
                let score = score_from_redis(&member, score)?;
                Ok((PlayerId::from(member), score))
            })
            .collect()
    }

    async fn resolve_names(&self, ids: &[PlayerId]) -> Result<Vec<Option<String>>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let key = self.keys.names();

        let mut pipe = redis::pipe();
        for id in ids {
            pipe.hget(&key, id.as_str());
        }

        let names: Vec<Option<String>> = self
            .round_trip("resolve_names", pipe.query_async(&mut conn))
            .await?;
        Ok(names)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let mut conn = self.conn.clone();
        let key = self.keys.scores();

        let count: u64 = self.round_trip("zcard", conn.zcard(&key)).await?;
        Ok(count)
    }

    async fn health_check(&self) -> Result<bool, StorageError> {
        let mut conn = self.conn.clone();
        let pong: String = self
            .round_trip("ping", redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(pong == "PONG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let keys = RedisKeys::new("leaderboard");
        assert_eq!(keys.scores(), "leaderboard:scores");
        assert_eq!(keys.names(), "leaderboard:names");
    }

    #[test]
    fn test_score_from_redis() {
        assert_eq!(score_from_redis("a", 30.0).unwrap(), 30);
        assert_eq!(score_from_redis("a", -7.0).unwrap(), -7);
        assert!(matches!(
            score_from_redis("a", 2.5),
            Err(StorageError::Corrupt(_))
        ));
        assert!(score_from_redis("a", f64::INFINITY).is_err());
    }

    #[test]
    fn test_zrange_bounds() {
        assert_eq!(zrange_bounds(RankWindow::top(10)), (0, 9));
        assert_eq!(zrange_bounds(RankWindow::top(1)), (0, 0));
        assert_eq!(zrange_bounds(RankWindow::all()), (0, -1));
        assert_eq!(zrange_bounds(RankWindow::new(5, None)), (5, -1));
    }

    #[tokio::test]
    async fn test_round_trip_times_out() {
        let timeout = Duration::from_millis(50);
        let result = bounded(timeout, "stall", std::future::pending::<RedisResult<()>>()).await;

        match result {
            Err(StorageError::Timeout(after)) => assert_eq!(after, timeout),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_round_trip_passes_errors_through() {
        let failed: RedisResult<()> = Err(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection reset",
        )));
        let result = bounded(Duration::from_secs(1), "fail", async { failed }).await;
        assert!(matches!(result, Err(StorageError::Redis(_))));

        let value = bounded(Duration::from_secs(1), "ok", async { Ok::<_, redis::RedisError>(7) }).await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails_promptly() {
        // Port 1 on localhost refuses connections
        let started = std::time::Instant::now();
        let result = RedisStore::connect(
            "redis://127.0.0.1:1/",
            "leaderboard",
            Duration::from_millis(500),
        )
        .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
