//! Ranking service.
//!
//! Turns validated submissions into store upserts and assembles ranked
//! listings. All three read operations share [`Leaderboard::ranked`]:
//! 1. range query in descending score order
//! 2. one batched display-name lookup for the whole page
//! 3. rank = window start + position + 1
//!
//! A player whose name is missing from the name table is listed as
//! [`UNKNOWN_PLAYER_NAME`](crate::models::UNKNOWN_PLAYER_NAME) instead of
//! failing the listing.

use std::iter;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::LeaderboardConfig;
use crate::models::{PlayerId, PlayerScore, RankedEntry};
use crate::storage::{RankWindow, RankingStore, StorageError};

/// Leaderboard operations over an injected ranking store.
#[derive(Clone)]
pub struct Leaderboard {
    store: Arc<dyn RankingStore>,
    size: u64,
    max_size: u64,
}

impl Leaderboard {
    pub fn new(store: Arc<dyn RankingStore>, config: &LeaderboardConfig) -> Self {
        Self {
            store,
            size: config.size,
            max_size: config.max_size,
        }
    }

    pub fn store(&self) -> &Arc<dyn RankingStore> {
        &self.store
    }

    /// Record a player's score, replacing any previous score and name.
    pub async fn submit(&self, entry: PlayerScore) -> Result<PlayerScore, StorageError> {
        self.store.upsert(&entry).await?;
        info!("Saved score {} for {} ({})", entry.score, entry.id, entry.name);
        Ok(entry)
    }

    /// The rank-1 player, if any score exists.
    pub async fn top_one(&self) -> Result<Option<RankedEntry>, StorageError> {
        let mut rows = self.ranked(RankWindow::top(1)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// The top of the leaderboard. `limit` defaults to the configured size
    /// and is clamped to `1..=max_size`.
    pub async fn top(&self, limit: Option<u64>) -> Result<Vec<RankedEntry>, StorageError> {
        self.ranked(RankWindow::top(self.window_size(limit))).await
    }

    /// Every ranked player.
    pub async fn all(&self) -> Result<Vec<RankedEntry>, StorageError> {
        self.ranked(RankWindow::all()).await
    }

    /// Number of entries a top-N request returns at most.
    pub fn window_size(&self, limit: Option<u64>) -> u64 {
        limit.unwrap_or(self.size).clamp(1, self.max_size)
    }

    /// Ranked rows for `window`, highest score first.
    pub async fn ranked(&self, window: RankWindow) -> Result<Vec<RankedEntry>, StorageError> {
        let rows = self.store.range_desc(window).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<PlayerId> = rows.iter().map(|(id, _)| id.clone()).collect();
        let names = self.store.resolve_names(&ids).await?;
        if names.len() != ids.len() {
            warn!(
                "Name lookup returned {} results for {} players",
                names.len(),
                ids.len()
            );
        }

        let entries: Vec<RankedEntry> = rows
            .into_iter()
            .zip(names.into_iter().chain(iter::repeat(None)))
            .enumerate()
            .map(|(position, ((id, score), name))| {
                if name.is_none() {
                    warn!("No display name stored for {}", id);
                }
                RankedEntry::new(window.rank_of(position), id, name, score)
            })
            .collect();

        debug!("Ranked {} entries from {:?}", entries.len(), window);
        Ok(entries)
    }
}
