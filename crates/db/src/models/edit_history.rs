//! Versioned edit-history records for revisions.

use std::collections::BTreeMap;

use ringi_core::error::CoreError;
use ringi_core::fields::{EditChangeSet, FieldChange};
use ringi_core::role::Role;
use ringi_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `revision_edit_histories` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionEditHistory {
    pub id: Uuid,
    pub revision_id: Uuid,
    pub editor_id: Uuid,
    pub editor_role: String,
    /// JSON object `{field: {before, after}}`.
    pub changes: serde_json::Value,
    pub comment: Option<String>,
    pub version_before: i32,
    pub version_after: i32,
    pub edited_at: Timestamp,
}

impl RevisionEditHistory {
    /// Parse the stored editor role string.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::parse(&self.editor_role).ok_or_else(|| {
            CoreError::Internal(format!("unknown editor role '{}'", self.editor_role))
        })
    }

    /// Decode the `changes` column into a typed map.
    pub fn change_map(&self) -> Result<BTreeMap<String, FieldChange>, CoreError> {
        serde_json::from_value(self.changes.clone())
            .map_err(|e| CoreError::Internal(format!("malformed changes payload: {e}")))
    }

    /// Project into the shape the version-diff fold consumes.
    pub fn change_set(&self) -> Result<EditChangeSet, CoreError> {
        Ok(EditChangeSet {
            version: self.version_after,
            editor_id: self.editor_id,
            edited_at: self.edited_at,
            changes: self.change_map()?,
        })
    }
}

/// Insert payload for a new edit-history record.
#[derive(Debug, Clone)]
pub struct NewEditRecord {
    pub revision_id: Uuid,
    pub editor_id: Uuid,
    pub editor_role: Role,
    pub changes: BTreeMap<String, FieldChange>,
    pub comment: Option<String>,
    pub version_before: i32,
    pub version_after: i32,
}

impl NewEditRecord {
    /// Serialize the changes map for the JSONB column.
    pub fn changes_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.changes).unwrap_or(serde_json::Value::Null)
    }
}
