//! Core data models for the leaderboard.

mod ids;
mod player;
mod submission;

pub use ids::*;
pub use player::*;
pub use submission::*;
