//! services/api/src/web/validation.rs
//!
//! Field rules for incoming book payloads. Validation is pure: it never
//! mutates the payload and never touches storage.

use crate::web::payload::{BookPayload, Field};
use reading_list_core::domain::ReadingStatus;
use serde_json::Value;

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// Whether the payload describes a whole book or only the fields to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Creating a book: `title` and `author` are required.
    Full,
    /// Updating a book: only fields that are present are checked.
    Partial,
}

/// A client-caused problem with the request payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No data provided")]
    NoData,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),
    #[error("Invalid status. Must be one of: want-to-read, reading, completed")]
    InvalidStatus,
    #[error("Rating must be a number")]
    RatingNotANumber,
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("No valid fields to update")]
    NoFields,
}

/// Checks `payload` against the rules for `mode`.
pub fn validate(payload: &BookPayload, mode: ValidationMode) -> Result<(), ValidationError> {
    for (name, field) in [("title", &payload.title), ("author", &payload.author)] {
        check_text(name, field, mode)?;
    }

    match &payload.status {
        Field::Missing => {}
        Field::Null => return Err(ValidationError::InvalidStatus),
        Field::Value(raw) => {
            parse_status(raw)?;
        }
    }

    if let Field::Value(raw) = &payload.rating {
        parse_rating(raw)?;
    }

    Ok(())
}

fn check_text(
    name: &'static str,
    field: &Field<String>,
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    let blank = match field {
        Field::Missing if mode == ValidationMode::Partial => return Ok(()),
        Field::Missing | Field::Null => true,
        Field::Value(text) => text.trim().is_empty(),
    };
    match (blank, mode) {
        (false, _) => Ok(()),
        (true, ValidationMode::Full) => Err(ValidationError::MissingField(name)),
        (true, ValidationMode::Partial) => Err(ValidationError::EmptyField(name)),
    }
}

/// Accepts only a string holding one of the canonical status labels.
pub fn parse_status(raw: &Value) -> Result<ReadingStatus, ValidationError> {
    raw.as_str()
        .and_then(|label| label.parse::<ReadingStatus>().ok())
        .ok_or(ValidationError::InvalidStatus)
}

/// Converts a raw rating to a number in `[1, 5]`, rounded to one decimal.
///
/// JSON numbers and numeric strings are accepted; anything else is not a number.
pub fn parse_rating(raw: &Value) -> Result<f64, ValidationError> {
    let rating = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|r| r.is_finite())
    .ok_or(ValidationError::RatingNotANumber)?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange);
    }
    Ok((rating * 10.0).round() / 10.0)
}
