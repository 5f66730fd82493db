//! Modification-instruction vocabulary and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::EDITABLE_FIELDS;

/// Maximum length for an instruction's text.
pub const MAX_INSTRUCTION_LENGTH: usize = 10_000;

/// Urgency of a modification instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Low, Self::Normal, Self::High, Self::Urgent];

    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parse the canonical snake_case encoding back into a priority.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate the free text of a modification instruction.
pub fn validate_instruction_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Instruction text is required".into()));
    }
    if text.len() > MAX_INSTRUCTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Instruction text exceeds maximum length of {MAX_INSTRUCTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that every requested field names an editable article attribute.
pub fn validate_required_fields(fields: &[String]) -> Result<(), CoreError> {
    for field in fields {
        if !EDITABLE_FIELDS.contains(&field.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown field '{field}' in required_fields"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
