//! Input validation for revision content.

use crate::error::CoreError;

/// Minimum length for a revision's justification text.
pub const MIN_REASON_LENGTH: usize = 10;

/// Maximum length for a revision's justification text.
pub const MAX_REASON_LENGTH: usize = 2_000;

/// Recognized target-audience values.
pub const VALID_TARGETS: &[&str] = &["internal", "external", "not_applicable"];

/// Validate the justification text supplied at revision creation.
pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("A revision reason is required".into()));
    }
    if trimmed.chars().count() < MIN_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Revision reason must be at least {MIN_REASON_LENGTH} characters"
        )));
    }
    if trimmed.chars().count() > MAX_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Revision reason must be at most {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an information-category code: exactly two ASCII alphanumerics.
pub fn validate_category_code(code: &str) -> Result<(), CoreError> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::Validation(format!(
            "Invalid category code '{code}'. Expected a two-character alphanumeric code"
        )));
    }
    Ok(())
}

/// Validate a target-audience value against the known set.
pub fn validate_target(target: &str) -> Result<(), CoreError> {
    if !VALID_TARGETS.contains(&target) {
        return Err(CoreError::Validation(format!(
            "Invalid target '{target}'. Must be one of: {}",
            VALID_TARGETS.join(", ")
        )));
    }
    Ok(())
}

/// Validate a comment that is mandatory for the operation (e.g. rejection).
pub fn validate_required_comment(comment: &str) -> Result<(), CoreError> {
    if comment.trim().is_empty() {
        return Err(CoreError::Validation("A comment is required".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
