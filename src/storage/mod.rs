//! Ranking store abstraction.
//!
//! The ranking store maps a player identifier to a score and answers
//! descending range queries by rank. A secondary table maps the identifier to
//! the player's display name. Implementations:
//! - Redis sorted set + hash (production)
//! - In-process ordered map (no external store, tests)
//!
//! Equal scores are ordered by descending identifier (byte order), which is
//! the native order of Redis `ZREVRANGE`.

pub mod jsonl;
pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::models::{PlayerId, PlayerScore};

pub use self::jsonl::{JsonlReader, JsonlWriter};
pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt store data: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A window of ranks, 0-indexed and inclusive at both ends.
///
/// `stop = None` runs through the last ranked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWindow {
    pub start: u64,
    pub stop: Option<u64>,
}

impl RankWindow {
    pub fn new(start: u64, stop: Option<u64>) -> Self {
        Self { start, stop }
    }

    /// The first `n` ranks. `n` must be at least 1.
    pub fn top(n: u64) -> Self {
        Self::new(0, Some(n.max(1) - 1))
    }

    /// Every ranked entry.
    pub fn all() -> Self {
        Self::new(0, None)
    }

    /// Maximum number of entries the window can hold.
    pub fn capacity(&self) -> Option<u64> {
        self.stop.map(|stop| stop.saturating_sub(self.start) + 1)
    }

    /// 1-indexed rank of the entry at `position` within the window.
    pub fn rank_of(&self, position: usize) -> u64 {
        self.start + position as u64 + 1
    }
}

/// An ordered score store.
///
/// Implementations must make [`RankingStore::upsert`] atomic for a single
/// player: a concurrent reader sees either the old score and name or the new
/// ones.
#[async_trait]
pub trait RankingStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Insert or overwrite a player's score and display name.
    async fn upsert(&self, entry: &PlayerScore) -> Result<(), StorageError>;

    /// Identifiers and scores within `window`, highest score first.
    async fn range_desc(&self, window: RankWindow) -> Result<Vec<(PlayerId, i64)>, StorageError>;

    /// Display names for `ids` in one round-trip, positionally aligned.
    async fn resolve_names(&self, ids: &[PlayerId]) -> Result<Vec<Option<String>>, StorageError>;

    /// Number of ranked players.
    async fn count(&self) -> Result<u64, StorageError>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> Result<bool, StorageError>;
}

/// Build the configured store.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn RankingStore>, StorageError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory ranking store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => {
            info!("Connecting to Redis ranking store at {}", config.redis_url());
            let store =
                RedisStore::connect(&config.redis_url(), &config.key_prefix, config.timeout())
                    .await?;
            Ok(Arc::new(store))
        }
    }
}
