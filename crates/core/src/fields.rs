//! Editable-field registry and field-level diffing.
//!
//! A revision proposes new values for a fixed set of article attributes.
//! Everything here operates on JSON value maps so the same diff code
//! serves the edit-history `changes` column, the version-diff fold, and
//! the before/after diff view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Timestamp, UserId};

/// The article attributes a revision may change, in presentation order.
pub const EDITABLE_FIELDS: [&str; 10] = [
    "title",
    "info_category",
    "keywords",
    "importance",
    "target",
    "question",
    "answer",
    "additional_comment",
    "publish_start",
    "publish_end",
];

/// A typed snapshot of the editable fields.
///
/// `None` means "no value" — for a `before_*` snapshot that the article
/// left the attribute empty, for an `after_*` snapshot that the revision
/// proposes no change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValues {
    pub title: Option<String>,
    pub info_category: Option<String>,
    pub keywords: Option<String>,
    pub importance: Option<bool>,
    pub target: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub additional_comment: Option<String>,
    pub publish_start: Option<Timestamp>,
    pub publish_end: Option<Timestamp>,
}

impl FieldValues {
    /// Project into a JSON value map keyed by [`EDITABLE_FIELDS`] names.
    ///
    /// Missing values become `Value::Null`; timestamps are rendered as
    /// RFC 3339 strings so maps compare and serialize stably.
    pub fn as_map(&self) -> BTreeMap<String, Value> {
        fn text(v: &Option<String>) -> Value {
            v.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
        }
        fn stamp(v: &Option<Timestamp>) -> Value {
            v.map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
        }

        let mut map = BTreeMap::new();
        map.insert("title".to_string(), text(&self.title));
        map.insert("info_category".to_string(), text(&self.info_category));
        map.insert("keywords".to_string(), text(&self.keywords));
        map.insert(
            "importance".to_string(),
            self.importance.map_or(Value::Null, Value::Bool),
        );
        map.insert("target".to_string(), text(&self.target));
        map.insert("question".to_string(), text(&self.question));
        map.insert("answer".to_string(), text(&self.answer));
        map.insert(
            "additional_comment".to_string(),
            text(&self.additional_comment),
        );
        map.insert("publish_start".to_string(), stamp(&self.publish_start));
        map.insert("publish_end".to_string(), stamp(&self.publish_end));
        map
    }
}

/// One field's before/after pair inside an edit-history record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub before: Value,
    pub after: Value,
}

/// Symmetric-difference diff between two value maps.
///
/// A field is included iff its value differs between the maps; a key
/// missing from either side is treated as null, and two equal nulls are
/// unchanged.
pub fn calculate_field_changes(
    before: &BTreeMap<String, Value>,
    after: &BTreeMap<String, Value>,
) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();
    for field in before.keys().chain(after.keys()) {
        if changes.contains_key(field) {
            continue;
        }
        let before_value = before.get(field).cloned().unwrap_or(Value::Null);
        let after_value = after.get(field).cloned().unwrap_or(Value::Null);
        if before_value != after_value {
            changes.insert(
                field.clone(),
                FieldChange { before: before_value, after: after_value },
            );
        }
    }
    changes
}

/// One row of the revision diff view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub before: Value,
    pub after: Value,
    pub is_modified: bool,
}

/// The full diff of a revision against its article snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionDiff {
    pub diffs: Vec<FieldDiff>,
    pub modified_fields: Vec<String>,
}

/// Compare the `before_*` snapshot with the proposed `after_*` values.
///
/// A field counts as modified only when a change is actually proposed
/// (`after` non-null) and differs from the snapshot. Unmodified fields
/// echo the `before` value in `after` so the view is always complete.
pub fn calculate_revision_diff(before: &FieldValues, after: &FieldValues) -> RevisionDiff {
    let before_map = before.as_map();
    let after_map = after.as_map();

    let mut diffs = Vec::with_capacity(EDITABLE_FIELDS.len());
    let mut modified_fields = Vec::new();

    for field in EDITABLE_FIELDS {
        let before_value = before_map.get(field).cloned().unwrap_or(Value::Null);
        let proposed = after_map.get(field).cloned().unwrap_or(Value::Null);

        let is_modified = !proposed.is_null() && proposed != before_value;
        if is_modified {
            modified_fields.push(field.to_string());
        }

        let after_value = if proposed.is_null() { before_value.clone() } else { proposed };
        diffs.push(FieldDiff {
            field: field.to_string(),
            before: before_value,
            after: after_value,
            is_modified,
        });
    }

    RevisionDiff { diffs, modified_fields }
}

/// One recorded edit, as consumed by the version-diff fold.
#[derive(Debug, Clone)]
pub struct EditChangeSet {
    /// The `version_after` of the edit that produced these changes.
    pub version: i32,
    pub editor_id: UserId,
    pub edited_at: Timestamp,
    pub changes: BTreeMap<String, FieldChange>,
}

/// A single step in a field's change history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEntry {
    pub version: i32,
    pub editor_id: UserId,
    pub changed_at: Timestamp,
    pub from: Value,
    pub to: Value,
}

/// A field's consolidated history across a version range.
#[derive(Debug, Clone, Serialize)]
pub struct FieldHistory {
    pub initial_value: Value,
    pub final_value: Value,
    pub change_history: Vec<ChangeEntry>,
}

/// Fold a sequence of edits (oldest first) into one view per field.
///
/// `initial_value` comes from the first edit touching the field,
/// `final_value` from the last; every touch is appended to
/// `change_history` in order.
pub fn combine_edit_changes(edits: &[EditChangeSet]) -> BTreeMap<String, FieldHistory> {
    let mut combined: BTreeMap<String, FieldHistory> = BTreeMap::new();
    for edit in edits {
        for (field, change) in &edit.changes {
            let entry = combined.entry(field.clone()).or_insert_with(|| FieldHistory {
                initial_value: change.before.clone(),
                final_value: change.after.clone(),
                change_history: Vec::new(),
            });
            entry.final_value = change.after.clone();
            entry.change_history.push(ChangeEntry {
                version: edit.version,
                editor_id: edit.editor_id,
                changed_at: edit.edited_at,
                from: change.before.clone(),
                to: change.after.clone(),
            });
        }
    }
    combined
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
