//! Field validation for commit payloads.
//!
//! Pure, synchronous checks applied before any remote write is attempted.
//! Rules run in a fixed order and the first violated rule wins; there is no
//! multi-error reporting. A failed check never reaches a remote collaborator.

use thiserror::Error;

use crate::models::{DetailsForm, EditBuffer};

/// Why a commit payload was rejected.
///
/// The rendered messages are user-facing; the UI shows them verbatim in the
/// failure notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A numeric-only field was blank or contained a non-digit.
    #[error("Please enter a valid {0}")]
    InvalidNumber(&'static str),

    /// A fixed-pattern field did not match its pattern exactly.
    #[error("Please enter a valid {0}")]
    InvalidPattern(&'static str),
}

/// Require a non-blank text field.
pub fn require_text(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(label));
    }
    Ok(())
}

/// Require a non-blank field consisting entirely of decimal digits.
pub fn require_number(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidNumber(label));
    }
    Ok(())
}

/// Require exactly `len` decimal digits and nothing else.
pub fn require_exact_digits(
    label: &'static str,
    value: &str,
    len: usize,
) -> Result<(), ValidationError> {
    if value.len() != len || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPattern(label));
    }
    Ok(())
}

/// Validate the first-time details payload.
///
/// Order matters: name, then age, then phone. Later rules are not evaluated
/// once one fails.
pub fn validate_details(form: &DetailsForm) -> Result<(), ValidationError> {
    require_text("Name", &form.name)?;
    require_number("age", &form.age)?;
    require_exact_digits("10-digit phone number", &form.phone, 10)?;
    Ok(())
}

/// Validate an edit buffer before a profile commit.
///
/// The buffer carries no numeric or pattern fields, so only the required
/// name check applies.
pub fn validate_profile_edits(buffer: &EditBuffer) -> Result<(), ValidationError> {
    require_text("Name", &buffer.name)
}
