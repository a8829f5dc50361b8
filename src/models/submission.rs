//! Score submission validation.
//!
//! A submission is a JSON object `{name, email, score}`. Checks run in a
//! fixed order and stop at the first failure:
//! 1. the body is a non-empty JSON object
//! 2. all three fields are present and non-empty
//! 3. the score coerces to an integer

use std::num::IntErrorKind;

use serde_json::{Map, Value};
use thiserror::Error;

use super::PlayerScore;

/// Largest score magnitude stored exactly by a sorted-set score (a double).
pub const MAX_SCORE_MAGNITUDE: u64 = 1 << 53;

/// Reasons a submission is rejected before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No data")]
    NoData,

    #[error("Not enough data")]
    NotEnoughData,

    #[error("Score must be an integer")]
    ScoreNotInteger,

    #[error("Score out of range")]
    ScoreOutOfRange,
}

/// Parse and validate a raw request body.
pub fn parse_submission(body: &[u8]) -> Result<PlayerScore, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::NoData);
    }
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::NoData)?;
    validate_submission(&value)
}

/// Validate an already-decoded submission.
pub fn validate_submission(value: &Value) -> Result<PlayerScore, ValidationError> {
    let fields = match value {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(ValidationError::NoData),
    };

    let name = text_field(fields, "name");
    let email = text_field(fields, "email");
    let score = fields.get("score").filter(|v| is_present(v));

    let (Some(name), Some(email), Some(score)) = (name, email, score) else {
        return Err(ValidationError::NotEnoughData);
    };

    let score = coerce_score(score)?;
    Ok(PlayerScore::new(email, name, score))
}

/// A trimmed, non-empty string field.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Whether a score value counts as supplied. A numeric zero does.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Coerce a JSON value to an integer score.
///
/// Accepts integers, floats without a fractional part, and decimal strings.
pub fn coerce_score(value: &Value) -> Result<i64, ValidationError> {
    let score = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.is_u64() {
                return Err(ValidationError::ScoreOutOfRange);
            } else {
                let f = n.as_f64().ok_or(ValidationError::ScoreNotInteger)?;
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(ValidationError::ScoreNotInteger);
                }
                if f.abs() > MAX_SCORE_MAGNITUDE as f64 {
                    return Err(ValidationError::ScoreOutOfRange);
                }
                f as i64
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => i,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                return Err(ValidationError::ScoreOutOfRange)
            }
            Err(_) => return Err(ValidationError::ScoreNotInteger),
        },
        _ => return Err(ValidationError::ScoreNotInteger),
    };

    if score.unsigned_abs() > MAX_SCORE_MAGNITUDE {
        return Err(ValidationError::ScoreOutOfRange);
    }
    Ok(score)
}
