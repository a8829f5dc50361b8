//! Player identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a player on the leaderboard.
///
/// The submitted email address is used as the identifier; it is the primary
/// key of a score entry and the key of the display-name lookup.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let id = PlayerId::from("ada@example.com");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ada@example.com\"");

        let parsed: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_player_id_display() {
        let id = PlayerId::new("grace@example.com".to_string());
        assert_eq!(format!("{}", id), "grace@example.com");
    }

    #[test]
    fn test_player_id_debug() {
        let id = PlayerId::from("debug@example.com");
        assert_eq!(format!("{:?}", id), "PlayerId(debug@example.com)");
    }

    #[test]
    fn test_player_id_ordering_is_bytewise() {
        let a = PlayerId::from("a@example.com");
        let b = PlayerId::from("b@example.com");
        let upper = PlayerId::from("Z@example.com");
        assert!(a < b);
        // Uppercase sorts before lowercase in byte order
        assert!(upper < a);
    }
}
