//! Revision CRUD, optimistic content edits, and diff computation.

use std::sync::Arc;

use ringi_core::error::CoreError;
use ringi_core::fields::{calculate_field_changes, calculate_revision_diff, FieldDiff};
use ringi_core::permissions;
use ringi_core::role::Actor;
use ringi_core::status::RevisionStatus;
use ringi_core::validation::{validate_category_code, validate_reason, validate_target};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use ringi_db::models::edit_history::NewEditRecord;
use ringi_db::models::revision::{
    CreateRevision, NewRevision, Revision, RevisionFilter, UpdateRevision,
};
use ringi_db::store::{ArticleStore, RevisionStore, StoreError, UserStore};
use ringi_events::Notifier;

use crate::revision_not_found;
use crate::workflow::WorkflowService;

/// The complete diff view of a revision.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionDetailDiff {
    pub revision_id: Uuid,
    pub modified_fields: Vec<String>,
    pub diffs: Vec<FieldDiff>,
}

pub struct RevisionService {
    revisions: Arc<dyn RevisionStore>,
    articles: Arc<dyn ArticleStore>,
    users: Arc<dyn UserStore>,
    workflow: Arc<WorkflowService>,
    notifier: Arc<dyn Notifier>,
}

impl RevisionService {
    pub fn new(
        revisions: Arc<dyn RevisionStore>,
        articles: Arc<dyn ArticleStore>,
        users: Arc<dyn UserStore>,
        workflow: Arc<WorkflowService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { revisions, articles, users, workflow, notifier }
    }

    async fn load(&self, revision_id: Uuid) -> Result<Revision, CoreError> {
        self.revisions
            .get(revision_id)
            .await?
            .ok_or_else(|| revision_not_found(revision_id))
    }

    fn validate_modifications(
        modifications: &ringi_db::models::revision::RevisionModifications,
    ) -> Result<(), CoreError> {
        if let Some(category) = &modifications.info_category {
            validate_category_code(category)?;
        }
        if let Some(target) = &modifications.target {
            validate_target(target)?;
        }
        Ok(())
    }

    /// Create a draft revision against an existing article.
    ///
    /// Snapshots the article's current attributes into the `before_*`
    /// columns; the single-active invariant is enforced by the store
    /// inside the inserting transaction.
    pub async fn create_revision(
        &self,
        input: CreateRevision,
        proposer: &Actor,
    ) -> Result<Revision, CoreError> {
        validate_reason(&input.reason)?;
        Self::validate_modifications(&input.modifications)?;

        let article = self
            .articles
            .get_by_article_id(&input.target_article_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "article",
                id: input.target_article_id.clone(),
            })?;

        let before = article.field_values();
        let after = input.modifications.apply_to(Default::default());

        let revision = self
            .revisions
            .create(NewRevision {
                target_article_id: input.target_article_id,
                proposer_id: proposer.id,
                reason: input.reason,
                before,
                after,
            })
            .await?;

        tracing::info!(
            revision_id = %revision.id,
            article_id = %revision.target_article_id,
            proposer_id = %proposer.id,
            "revision created"
        );

        match self.users.list_approvers().await {
            Ok(approvers) => {
                if let Err(err) = self
                    .notifier
                    .notify_revision_created(&revision, &approvers)
                    .await
                {
                    tracing::warn!(error = %err, revision_id = %revision.id, "creation notification failed");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, revision_id = %revision.id, "approver lookup failed, skipping creation notification");
            }
        }

        Ok(revision)
    }

    /// Fetch a revision, enforcing the view rule.
    pub async fn get_revision(&self, revision_id: Uuid, actor: &Actor) -> Result<Revision, CoreError> {
        let revision = self.load(revision_id).await?;
        let decision = permissions::can_view(actor, &revision.meta()?);
        if !decision.allowed {
            return Err(CoreError::Forbidden(
                decision.reason.unwrap_or_else(|| "no permission to view this revision".to_string()),
            ));
        }
        Ok(revision)
    }

    /// Edit a revision's proposed content.
    ///
    /// `expected_version` is the version the caller loaded; a mismatch
    /// fails with `Conflict` before anything is written. A change set
    /// that turns out empty is a no-op: no version bump, no history row.
    pub async fn update_revision(
        &self,
        revision_id: Uuid,
        input: UpdateRevision,
        actor: &Actor,
        expected_version: i32,
    ) -> Result<Revision, CoreError> {
        if let Some(reason) = &input.reason {
            validate_reason(reason)?;
        }
        Self::validate_modifications(&input.modifications)?;

        let revision = self.load(revision_id).await?;
        let decision = permissions::can_edit(actor, &revision.meta()?);
        if !decision.allowed {
            return Err(CoreError::Forbidden(
                decision.reason.unwrap_or_else(|| "no permission to edit this revision".to_string()),
            ));
        }

        if revision.version != expected_version {
            return Err(CoreError::Conflict(format!(
                "revision was modified concurrently: expected version {expected_version}, found {}",
                revision.version
            )));
        }

        let new_reason = input.reason.unwrap_or_else(|| revision.reason.clone());
        let current_after = revision.after_values();
        let new_after = input.modifications.apply_to(current_after.clone());

        // Diff over the proposed values plus the reason text.
        let mut before_map = current_after.as_map();
        before_map.insert("reason".to_string(), Value::String(revision.reason.clone()));
        let mut after_map = new_after.as_map();
        after_map.insert("reason".to_string(), Value::String(new_reason.clone()));

        let changes = calculate_field_changes(&before_map, &after_map);
        if changes.is_empty() {
            return Ok(revision);
        }

        let edit = NewEditRecord {
            revision_id,
            editor_id: actor.id,
            editor_role: actor.role,
            changes: changes.clone(),
            comment: input.comment,
            version_before: revision.version,
            version_after: revision.version + 1,
        };

        let updated = self
            .revisions
            .apply_content_edit(revision_id, expected_version, &new_reason, &new_after, &edit)
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            editor_id = %actor.id,
            changed_fields = changes.len(),
            version = updated.version,
            "revision content edited"
        );

        if actor.id != updated.proposer_id {
            if let Err(err) = self
                .notifier
                .notify_revision_edited(&updated, actor.id, updated.proposer_id, &changes)
                .await
            {
                tracing::warn!(error = %err, revision_id = %revision_id, "edit notification failed");
            }
        }

        Ok(updated)
    }

    /// Delete a draft revision.
    pub async fn delete_revision(&self, revision_id: Uuid, actor: &Actor) -> Result<(), CoreError> {
        let revision = self.load(revision_id).await?;
        if revision.status()? != RevisionStatus::Draft {
            return Err(CoreError::InvalidState(
                "only draft revisions may be deleted".to_string(),
            ));
        }
        if !actor.is_admin() && revision.proposer_id != actor.id {
            return Err(CoreError::Forbidden(
                "only the proposer may delete a revision".to_string(),
            ));
        }

        self.revisions.delete(revision_id).await?;

        tracing::info!(revision_id = %revision_id, actor_id = %actor.id, "revision deleted");
        Ok(())
    }

    /// List revisions matching a filter, newest first.
    pub async fn list_revisions(
        &self,
        filter: &RevisionFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Revision>, CoreError> {
        Ok(self.revisions.list(filter, skip, limit).await?)
    }

    /// The field-by-field diff of a revision against its article snapshot.
    pub async fn calculate_diff(&self, revision_id: Uuid) -> Result<RevisionDetailDiff, CoreError> {
        let revision = self.load(revision_id).await?;
        let diff = calculate_revision_diff(&revision.before_values(), &revision.after_values());
        Ok(RevisionDetailDiff {
            revision_id,
            modified_fields: diff.modified_fields,
            diffs: diff.diffs,
        })
    }

    /// Submit (or resubmit) a revision for review.
    pub async fn submit_revision(
        &self,
        revision_id: Uuid,
        actor: &Actor,
    ) -> Result<Revision, CoreError> {
        let revision = self
            .workflow
            .transition_status(revision_id, RevisionStatus::UnderReview, actor, None)
            .await?;

        match self.users.list_approvers().await {
            Ok(approvers) => {
                if let Err(err) = self
                    .notifier
                    .notify_revision_submitted(&revision, &approvers)
                    .await
                {
                    tracing::warn!(error = %err, revision_id = %revision_id, "submission notification failed");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, revision_id = %revision_id, "approver lookup failed, skipping submission notification");
            }
        }

        Ok(revision)
    }

    /// The actions `actor` may currently perform on the revision.
    pub async fn available_actions(
        &self,
        revision_id: Uuid,
        actor: &Actor,
    ) -> Result<Vec<ringi_core::action::RevisionAction>, CoreError> {
        let revision = self.load(revision_id).await?;
        Ok(permissions::available_actions(actor, &revision.meta()?))
    }
}
