//! The versioned edit trail and version-range diffs.

use std::collections::BTreeMap;
use std::sync::Arc;

use ringi_core::error::CoreError;
use ringi_core::fields::{combine_edit_changes, EditChangeSet, FieldHistory};
use serde::Serialize;
use uuid::Uuid;

use ringi_db::models::edit_history::{NewEditRecord, RevisionEditHistory};
use ringi_db::store::EditHistoryStore;

// The pure diff primitive lives in core; re-exported here because this
// service is its natural home for callers.
pub use ringi_core::fields::calculate_field_changes;

/// A consolidated diff between two versions of a revision.
#[derive(Debug, Clone, Serialize)]
pub struct VersionDiff {
    pub revision_id: Uuid,
    pub from_version: i32,
    pub to_version: i32,
    pub changes: BTreeMap<String, FieldHistory>,
    pub total_edits: usize,
}

pub struct EditHistoryService {
    edits: Arc<dyn EditHistoryStore>,
}

impl EditHistoryService {
    pub fn new(edits: Arc<dyn EditHistoryStore>) -> Self {
        Self { edits }
    }

    /// Append an edit record to the trail.
    pub async fn record_edit(&self, edit: NewEditRecord) -> Result<RevisionEditHistory, CoreError> {
        let record = self.edits.append(&edit).await?;
        tracing::info!(
            revision_id = %record.revision_id,
            editor_id = %record.editor_id,
            changes = edit.changes.len(),
            version_before = record.version_before,
            version_after = record.version_after,
            "edit history recorded"
        );
        Ok(record)
    }

    /// The full trail for a revision, oldest first.
    pub async fn get_edit_history(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionEditHistory>, CoreError> {
        Ok(self.edits.list_for_revision(revision_id).await?)
    }

    /// Consolidate every edit whose versions fall inside
    /// `[from_version, to_version]` into one view per field.
    ///
    /// Returns an empty change map and `total_edits = 0` when no records
    /// match.
    pub async fn get_version_diff(
        &self,
        revision_id: Uuid,
        from_version: i32,
        to_version: i32,
    ) -> Result<VersionDiff, CoreError> {
        let records = self.edits.list_for_revision(revision_id).await?;

        let change_sets: Vec<EditChangeSet> = records
            .iter()
            .filter(|r| r.version_before >= from_version && r.version_after <= to_version)
            .map(RevisionEditHistory::change_set)
            .collect::<Result<_, _>>()?;

        Ok(VersionDiff {
            revision_id,
            from_version,
            to_version,
            changes: combine_edit_changes(&change_sets),
            total_edits: change_sets.len(),
        })
    }
}
