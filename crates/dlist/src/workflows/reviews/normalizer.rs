use serde_json::Value;
use tracing::debug;

/// Ratings are collected on a one-to-five star scale.
pub const RATING_SCALE_MAX: f64 = 5.0;

/// Reasons a stored rating column cannot be used as a rating.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidRatingValue {
    #[error("rating is missing")]
    Missing,
    #[error("rating '{0}' is not numeric")]
    NotNumeric(String),
    #[error("rating is not a finite number")]
    NotFinite,
    #[error("rating {0} is not positive")]
    NotPositive(f64),
}

/// Convert a raw column value into a usable rating.
pub fn try_normalize(raw: Option<&Value>) -> Result<f64, InvalidRatingValue> {
    let number = match raw {
        None | Some(Value::Null) => return Err(InvalidRatingValue::Missing),
        Some(Value::Number(number)) => number.as_f64().ok_or(InvalidRatingValue::NotFinite)?,
        Some(Value::String(text)) => parse_text(text)?,
        Some(other) => return Err(InvalidRatingValue::NotNumeric(other.to_string())),
    };

    try_normalize_number(number)
}

pub fn try_normalize_number(number: f64) -> Result<f64, InvalidRatingValue> {
    if !number.is_finite() {
        return Err(InvalidRatingValue::NotFinite);
    }
    if number <= 0.0 {
        return Err(InvalidRatingValue::NotPositive(number));
    }
    if number > RATING_SCALE_MAX {
        // Passed through untouched; flagged for data-quality follow-up only.
        debug!(rating = number, "rating exceeds the five point scale");
    }

    Ok(number)
}

/// `None` means "not rated", which is never the same as a zero rating.
pub fn normalize(raw: Option<&Value>) -> Option<f64> {
    try_normalize(raw).ok()
}

pub fn normalize_number(number: f64) -> Option<f64> {
    try_normalize_number(number).ok()
}

fn parse_text(text: &str) -> Result<f64, InvalidRatingValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InvalidRatingValue::Missing);
    }

    trimmed
        .parse::<f64>()
        .map_err(|_| InvalidRatingValue::NotNumeric(trimmed.to_string()))
}
