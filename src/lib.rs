//! # Leaderboard
//!
//! A network-accessible leaderboard: clients submit a player's name, email
//! and score; the service keeps one score per player and answers top-1,
//! top-N and full ranked listings.
//!
//! ## Architecture
//!
//! - **models**: Score entries, ranked rows and submission validation
//! - **storage**: Ranking store trait with Redis and in-memory backends, JSONL files
//! - **ranking**: Leaderboard operations over an injected store
//! - **api**: REST API endpoints
//! - **ingest**: Bulk JSONL import and export
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod ranking;
pub mod storage;

pub use models::*;
