//! Modification instructions attached to a revision.

use ringi_core::error::CoreError;
use ringi_core::instruction::Priority;
use ringi_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `revision_instructions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionInstruction {
    pub id: Uuid,
    pub revision_id: Uuid,
    pub instructor_id: Uuid,
    pub instruction_text: String,
    /// JSON array of field names requiring modification.
    pub required_fields: Option<serde_json::Value>,
    pub priority: String,
    pub due_date: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_comment: Option<String>,
    pub created_at: Timestamp,
}

impl RevisionInstruction {
    /// Parse the stored priority string.
    pub fn priority(&self) -> Result<Priority, CoreError> {
        Priority::parse(&self.priority)
            .ok_or_else(|| CoreError::Internal(format!("unknown priority '{}'", self.priority)))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    /// Decode `required_fields` into a list, empty when absent.
    pub fn required_field_names(&self) -> Vec<String> {
        self.required_fields
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// DTO for attaching an instruction to a revision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstruction {
    pub instruction_text: String,
    pub required_fields: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
}

/// Fully resolved insert payload.
#[derive(Debug, Clone)]
pub struct NewInstruction {
    pub revision_id: Uuid,
    pub instructor_id: Uuid,
    pub instruction_text: String,
    pub required_fields: Option<Vec<String>>,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
}

impl NewInstruction {
    /// Serialize the required-fields list for the JSONB column.
    pub fn required_fields_json(&self) -> Option<serde_json::Value> {
        self.required_fields
            .as_ref()
            .map(|fields| serde_json::to_value(fields).unwrap_or(serde_json::Value::Null))
    }
}
