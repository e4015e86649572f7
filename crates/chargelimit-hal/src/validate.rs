//! Input validation for new threshold values

use std::fmt;
use thiserror::Error;

/// Lowest threshold this tool will write
pub const MIN_THRESHOLD: u8 = 20;
/// Highest threshold this tool will write
pub const MAX_THRESHOLD: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Not a whole number: {0:?}")]
    NotANumber(String),

    #[error("{0} is outside {min}-{max}", min = MIN_THRESHOLD, max = MAX_THRESHOLD)]
    OutOfRange(String),
}

/// A threshold that passed [`validate`]; the only value a writer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold(u8);

impl Threshold {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate user text as a threshold
///
/// Accepts an optional leading `-` followed by ASCII digits, nothing else, and
/// a value within `MIN_THRESHOLD..=MAX_THRESHOLD`.
pub fn validate(text: &str) -> Result<Threshold, ValidationError> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotANumber(text.to_string()));
    }

    // Digit strings too long for i64 are certainly out of range
    let value: i64 = text
        .parse()
        .map_err(|_| ValidationError::OutOfRange(text.to_string()))?;

    match u8::try_from(value) {
        Ok(v) if (MIN_THRESHOLD..=MAX_THRESHOLD).contains(&v) => Ok(Threshold(v)),
        _ => Err(ValidationError::OutOfRange(text.to_string())),
    }
}
