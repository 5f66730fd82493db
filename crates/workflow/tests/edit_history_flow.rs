//! The edit trail service: recording, listing, and version-range diffs.

mod common;

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use common::Harness;
use ringi_core::error::CoreError;
use ringi_core::fields::FieldChange;
use ringi_core::role::Role;
use ringi_db::models::edit_history::NewEditRecord;
use ringi_db::models::revision::{RevisionModifications, UpdateRevision};
use serde_json::{json, Value};
use uuid::Uuid;

fn change(field: &str, before: Value, after: Value) -> (String, FieldChange) {
    (field.to_string(), FieldChange { before, after })
}

fn record(revision_id: Uuid, version_before: i32, changes: Vec<(String, FieldChange)>) -> NewEditRecord {
    NewEditRecord {
        revision_id,
        editor_id: Uuid::new_v4(),
        editor_role: Role::Approver,
        changes: changes.into_iter().collect(),
        comment: None,
        version_before,
        version_after: version_before + 1,
    }
}

#[tokio::test]
async fn record_edit_appends_to_the_trail() {
    let harness = Harness::new();
    let revision_id = Uuid::new_v4();

    harness
        .edits
        .record_edit(record(
            revision_id,
            1,
            vec![change("title", json!("a"), json!("b"))],
        ))
        .await
        .unwrap();
    harness
        .edits
        .record_edit(record(
            revision_id,
            2,
            vec![change("title", json!("b"), json!("c"))],
        ))
        .await
        .unwrap();

    let trail = harness.edits.get_edit_history(revision_id).await.unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].version_after, 2);
    assert_eq!(trail[1].version_after, 3);
}

#[tokio::test]
async fn version_diff_consolidates_per_field() {
    let harness = Harness::new();
    let revision_id = Uuid::new_v4();

    harness
        .edits
        .record_edit(record(
            revision_id,
            1,
            vec![
                change("title", json!("v1"), json!("v2")),
                change("answer", Value::Null, json!("first draft")),
            ],
        ))
        .await
        .unwrap();
    harness
        .edits
        .record_edit(record(
            revision_id,
            2,
            vec![change("title", json!("v2"), json!("v3"))],
        ))
        .await
        .unwrap();

    let diff = harness
        .edits
        .get_version_diff(revision_id, 1, 3)
        .await
        .unwrap();

    assert_eq!(diff.total_edits, 2);
    let title = &diff.changes["title"];
    assert_eq!(title.initial_value, json!("v1"));
    assert_eq!(title.final_value, json!("v3"));
    assert_eq!(title.change_history.len(), 2);
    assert_eq!(title.change_history[0].version, 2);
    assert_eq!(title.change_history[1].version, 3);

    let answer = &diff.changes["answer"];
    assert_eq!(answer.initial_value, Value::Null);
    assert_eq!(answer.final_value, json!("first draft"));
}

#[tokio::test]
async fn version_diff_respects_the_range_bounds() {
    let harness = Harness::new();
    let revision_id = Uuid::new_v4();

    for version in 1..=3 {
        harness
            .edits
            .record_edit(record(
                revision_id,
                version,
                vec![change(
                    "answer",
                    json!(format!("v{version}")),
                    json!(format!("v{}", version + 1)),
                )],
            ))
            .await
            .unwrap();
    }

    // Only the middle edit (2 -> 3) fits entirely inside [2, 3].
    let diff = harness
        .edits
        .get_version_diff(revision_id, 2, 3)
        .await
        .unwrap();
    assert_eq!(diff.total_edits, 1);
    assert_eq!(diff.changes["answer"].initial_value, json!("v2"));
    assert_eq!(diff.changes["answer"].final_value, json!("v3"));
}

#[tokio::test]
async fn version_diff_of_empty_range_is_empty() {
    let harness = Harness::new();
    let revision_id = Uuid::new_v4();

    let diff = harness
        .edits
        .get_version_diff(revision_id, 1, 99)
        .await
        .unwrap();
    assert_eq!(diff.total_edits, 0);
    assert!(diff.changes.is_empty());
}

#[tokio::test]
async fn service_edits_feed_the_version_diff() {
    let harness = Harness::new();
    let (proposer, _) = harness.seed_basic().await;
    let revision = harness.draft_revision(&proposer).await;

    for (version, answer) in [(1, "take one"), (2, "take two")] {
        harness
            .revisions
            .update_revision(
                revision.id,
                UpdateRevision {
                    modifications: RevisionModifications {
                        answer: Some(answer.to_string()),
                        ..RevisionModifications::default()
                    },
                    ..UpdateRevision::default()
                },
                &proposer,
                version,
            )
            .await
            .unwrap();
    }

    let diff = harness
        .edits
        .get_version_diff(revision.id, 1, 3)
        .await
        .unwrap();
    assert_eq!(diff.total_edits, 2);
    assert_eq!(diff.changes["answer"].final_value, json!("take two"));
}

#[tokio::test]
async fn identity_diff_is_empty() {
    let mut map = BTreeMap::new();
    map.insert("title".to_string(), json!("same"));
    map.insert("answer".to_string(), Value::Null);
    assert!(ringi_workflow::edit_history::calculate_field_changes(&map, &map).is_empty());
}

#[tokio::test]
async fn malformed_stored_changes_surface_as_internal() {
    let harness = Harness::new();
    let revision_id = Uuid::new_v4();

    let mut bad = record(revision_id, 1, vec![]);
    bad.changes = BTreeMap::new();
    harness.edits.record_edit(bad).await.unwrap();

    // An empty object is fine; the fold just produces nothing.
    let diff = harness
        .edits
        .get_version_diff(revision_id, 1, 2)
        .await
        .unwrap();
    assert_eq!(diff.total_edits, 1);
    assert!(diff.changes.is_empty());

    // A record whose payload is not an object cannot be decoded.
    let row = harness.edits.get_edit_history(revision_id).await.unwrap();
    assert!(row[0].change_map().is_ok());
    let mut corrupted = row[0].clone();
    corrupted.changes = json!("not a map");
    assert_matches!(corrupted.change_map(), Err(CoreError::Internal(_)));
}
