//! Score entries and ranked listing rows.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Name shown for a ranked player whose display name could not be resolved.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

/// A player's stored score.
///
/// One entry exists per [`PlayerId`]. Submitting again for the same
/// identifier overwrites both the name and the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    /// Unique player key (the submitted email)
    #[serde(rename = "email")]
    pub id: PlayerId,

    /// Display name shown in listings
    pub name: String,

    /// Ranking value
    pub score: i64,
}

impl PlayerScore {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, score: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score,
        }
    }
}

/// One row of a ranked listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-indexed position in descending score order
    pub rank: u64,
    pub email: PlayerId,
    pub name: String,
    pub score: i64,
}

impl RankedEntry {
    /// Build a row, substituting [`UNKNOWN_PLAYER_NAME`] for a missing name.
    pub fn new(rank: u64, email: PlayerId, name: Option<String>, score: i64) -> Self {
        Self {
            rank,
            email,
            name: name.unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string()),
            score,
        }
    }
}
