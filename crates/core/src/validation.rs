//! Shared field validation helpers.
//!
//! Entity modules compose these; each returns `CoreError::Validation` naming
//! the offending field.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Maximum length for entity names and titles.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for free-text descriptions and notes.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Validate a required name: non-blank and at most `MAX_NAME_LENGTH` chars.
pub fn validate_name(value: &str, field: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field against `MAX_DESCRIPTION_LENGTH`.
pub fn validate_description(value: Option<&str>, field: &str) -> Result<(), CoreError> {
    match value {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(CoreError::Validation(format!(
                "{field} must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}

/// Validate that an integer falls within `[min, max]`.
pub fn validate_int_range(value: i32, min: i32, max: i32, field: &str) -> Result<(), CoreError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )))
    }
}

/// Validate that a monetary or count value is finite and not negative.
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), CoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

/// Validate that `value` is one of `allowed`.
pub fn validate_one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Validate that an optional end date does not precede an optional start date.
pub fn validate_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(CoreError::Validation(format!(
            "End date {e} is before start date {s}"
        ))),
        _ => Ok(()),
    }
}
