//! Bulk score import and export.
//!
//! Imports read JSONL submissions (`{name, email, score}` per line) and run
//! each one through the same validation and upsert as the HTTP endpoint.
//! Exports write the full ranked list as JSONL.

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::models::validate_submission;
use crate::ranking::Leaderboard;
use crate::storage::{JsonlReader, JsonlWriter, StorageError};

/// Result of an import run.
#[derive(Debug, Default)]
pub struct ImportResult {
    pub accepted: usize,
    pub rejected: usize,
    pub errors: Vec<String>,
}

/// Submit every line of a JSONL file.
///
/// Unparseable or invalid lines are counted and skipped. A store failure
/// stops the import.
pub async fn import_scores(path: &Path, leaderboard: &Leaderboard) -> Result<ImportResult, StorageError> {
    info!("Importing scores from {:?}", path);

    let mut result = ImportResult::default();
    for (line, record) in JsonlReader::<Value>::new(path.to_path_buf()).iter()? {
        let entry = match record.map_err(|e| e.to_string()).and_then(|value| {
            validate_submission(&value).map_err(|e| e.to_string())
        }) {
            Ok(entry) => entry,
            Err(e) => {
                let err = format!("line {}: {}", line, e);
                warn!("Rejected {}", err);
                result.errors.push(err);
                result.rejected += 1;
                continue;
            }
        };

        leaderboard.submit(entry).await?;
        result.accepted += 1;
    }

    info!(
        "Import finished: {} accepted, {} rejected",
        result.accepted, result.rejected
    );
    Ok(result)
}

/// Write the full ranked list to a JSONL file.
pub async fn export_scores(path: &Path, leaderboard: &Leaderboard) -> Result<usize, StorageError> {
    let entries = leaderboard.all().await?;
    JsonlWriter::new(path.to_path_buf()).write_all(&entries)
}
