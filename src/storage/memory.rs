//! In-process ranking store.
//!
//! Keeps a descending ordered index next to the score and name tables. All
//! three live behind one lock so an upsert is observed as a single change.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{RankWindow, RankingStore, StorageError};
use crate::models::{PlayerId, PlayerScore};

/// Sort key: highest score first, then descending identifier.
type RankKey = (Reverse<i64>, Reverse<PlayerId>);

#[derive(Default)]
struct Tables {
    ranking: BTreeSet<RankKey>,
    scores: HashMap<PlayerId, i64>,
    names: HashMap<PlayerId, String>,
}

/// Ranking store held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a display name while keeping the ranking, leaving the two tables
    /// out of sync.
    #[cfg(test)]
    pub(crate) async fn forget_name(&self, id: &PlayerId) {
        self.tables.write().await.names.remove(id);
    }

    #[cfg(test)]
    pub(crate) async fn score_of(&self, id: &PlayerId) -> Option<i64> {
        self.tables.read().await.scores.get(id).copied()
    }
}

#[async_trait]
impl RankingStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn upsert(&self, entry: &PlayerScore) -> Result<(), StorageError> {
        let mut tables = self.tables.write().await;

        if let Some(previous) = tables.scores.insert(entry.id.clone(), entry.score) {
            tables
                .ranking
                .remove(&(Reverse(previous), Reverse(entry.id.clone())));
        }
        tables
            .ranking
            .insert((Reverse(entry.score), Reverse(entry.id.clone())));
        tables.names.insert(entry.id.clone(), entry.name.clone());

        debug!("Stored score {} for {}", entry.score, entry.id);
        Ok(())
    }

    async fn range_desc(&self, window: RankWindow) -> Result<Vec<(PlayerId, i64)>, StorageError> {
        let tables = self.tables.read().await;
        let take = window
            .capacity()
            .map(|n| n as usize)
            .unwrap_or(usize::MAX);

        Ok(tables
            .ranking
            .iter()
            .skip(window.start as usize)
            .take(take)
            .map(|(Reverse(score), Reverse(id))| (id.clone(), *score))
            .collect())
    }

    async fn resolve_names(&self, ids: &[PlayerId]) -> Result<Vec<Option<String>>, StorageError> {
        let tables = self.tables.read().await;
        Ok(ids.iter().map(|id| tables.names.get(id).cloned()).collect())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.tables.read().await.scores.len() as u64)
    }

    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }
}
