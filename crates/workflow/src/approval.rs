//! Approval orchestration: the four state-changing review actions.
//!
//! Every mutating method follows the same contract: validate the state
//! precondition, then the actor's role, perform the mutation together
//! with its approval-history record in one store transaction, and finally
//! attempt a notification. A notifier failure is logged and swallowed —
//! the committed transition stands.

use std::sync::Arc;

use ringi_core::action::ApprovalAction;
use ringi_core::error::CoreError;
use ringi_core::instruction::{validate_instruction_text, validate_required_fields};
use ringi_core::role::Actor;
use ringi_core::status::RevisionStatus;
use uuid::Uuid;

use ringi_db::models::approval::{ApprovalHistory, NewApprovalRecord};
use ringi_db::models::instruction::{CreateInstruction, NewInstruction};
use ringi_db::models::revision::{ApprovalStamp, Revision, StatusCounts};
use ringi_db::store::{ApprovalHistoryStore, RevisionStore, StoreError};
use ringi_events::Notifier;

use crate::revision_not_found;

pub struct ApprovalService {
    revisions: Arc<dyn RevisionStore>,
    history: Arc<dyn ApprovalHistoryStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApprovalService {
    pub fn new(
        revisions: Arc<dyn RevisionStore>,
        history: Arc<dyn ApprovalHistoryStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { revisions, history, notifier }
    }

    async fn load(&self, revision_id: Uuid) -> Result<Revision, CoreError> {
        self.revisions
            .get(revision_id)
            .await?
            .ok_or_else(|| revision_not_found(revision_id))
    }

    fn ensure_reviewable(status: RevisionStatus, action: &str) -> Result<(), CoreError> {
        if !matches!(
            status,
            RevisionStatus::UnderReview | RevisionStatus::RevisionRequested
        ) {
            return Err(CoreError::InvalidState(format!(
                "cannot {action} revision in status {status}"
            )));
        }
        Ok(())
    }

    /// Approve a revision under review.
    pub async fn approve_revision(
        &self,
        revision_id: Uuid,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<Revision, CoreError> {
        let revision = self.load(revision_id).await?;
        Self::ensure_reviewable(revision.status()?, "approve")?;
        if !actor.can_review() {
            return Err(CoreError::Forbidden("no approval permission".to_string()));
        }

        let stamp = ApprovalStamp {
            approver_id: actor.id,
            approved_at: chrono::Utc::now(),
            comment: comment.clone(),
        };
        let mut audit = NewApprovalRecord::new(revision_id, actor.id, ApprovalAction::Approved);
        audit.comment = comment;

        let updated = self
            .revisions
            .apply_transition(revision_id, RevisionStatus::Approved, Some(&stamp), &audit)
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            approver_id = %actor.id,
            "revision approved"
        );

        if let Err(err) = self
            .notifier
            .notify_revision_approved(&updated, actor.id, updated.proposer_id)
            .await
        {
            tracing::warn!(error = %err, revision_id = %revision_id, "approval notification failed");
        }

        Ok(updated)
    }

    /// Reject a revision under review. The comment is mandatory.
    pub async fn reject_revision(
        &self,
        revision_id: Uuid,
        actor: &Actor,
        comment: &str,
    ) -> Result<Revision, CoreError> {
        if comment.trim().is_empty() {
            return Err(CoreError::Validation(
                "A rejection comment is required".to_string(),
            ));
        }

        let revision = self.load(revision_id).await?;
        Self::ensure_reviewable(revision.status()?, "reject")?;
        if !actor.can_review() {
            return Err(CoreError::Forbidden("no rejection permission".to_string()));
        }

        let stamp = ApprovalStamp {
            approver_id: actor.id,
            approved_at: chrono::Utc::now(),
            comment: Some(comment.to_string()),
        };
        let audit = NewApprovalRecord::new(revision_id, actor.id, ApprovalAction::Rejected)
            .with_comment(comment);

        let updated = self
            .revisions
            .apply_transition(revision_id, RevisionStatus::Rejected, Some(&stamp), &audit)
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            rejector_id = %actor.id,
            "revision rejected"
        );

        if let Err(err) = self
            .notifier
            .notify_revision_rejected(&updated, actor.id, updated.proposer_id, Some(comment))
            .await
        {
            tracing::warn!(error = %err, revision_id = %revision_id, "rejection notification failed");
        }

        Ok(updated)
    }

    /// Withdraw an active revision. Only the proposer or an admin may.
    pub async fn withdraw_revision(
        &self,
        revision_id: Uuid,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<Revision, CoreError> {
        let revision = self.load(revision_id).await?;
        let status = revision.status()?;
        if !status.is_active() {
            return Err(CoreError::InvalidState(format!(
                "cannot withdraw revision in status {status}"
            )));
        }
        if !actor.is_admin() && revision.proposer_id != actor.id {
            return Err(CoreError::Forbidden(
                "only the proposer or an admin may withdraw a revision".to_string(),
            ));
        }

        let mut audit = NewApprovalRecord::new(revision_id, actor.id, ApprovalAction::Withdrawn);
        audit.comment = comment;

        let updated = self
            .revisions
            .apply_transition(revision_id, RevisionStatus::Withdrawn, None, &audit)
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            withdrawer_id = %actor.id,
            "revision withdrawn"
        );

        Ok(updated)
    }

    /// Request modifications on a revision under review.
    ///
    /// The status change, the audit record, and the companion instruction
    /// are written in one store transaction.
    pub async fn request_modification(
        &self,
        revision_id: Uuid,
        actor: &Actor,
        instruction: CreateInstruction,
    ) -> Result<Revision, CoreError> {
        validate_instruction_text(&instruction.instruction_text)?;
        if let Some(fields) = &instruction.required_fields {
            validate_required_fields(fields)?;
        }

        let revision = self.load(revision_id).await?;
        let status = revision.status()?;
        if status != RevisionStatus::UnderReview {
            return Err(CoreError::InvalidState(format!(
                "cannot request modification for revision in status {status}"
            )));
        }
        if !actor.can_review() {
            return Err(CoreError::Forbidden(
                "no modification request permission".to_string(),
            ));
        }

        let audit = NewApprovalRecord::new(revision_id, actor.id, ApprovalAction::RevisionRequested)
            .with_comment(instruction.instruction_text.clone());
        let new_instruction = NewInstruction {
            revision_id,
            instructor_id: actor.id,
            instruction_text: instruction.instruction_text.clone(),
            required_fields: instruction.required_fields,
            priority: instruction.priority,
            due_date: instruction.due_date,
        };

        let updated = self
            .revisions
            .apply_modification_request(revision_id, &audit, &new_instruction)
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            requester_id = %actor.id,
            priority = %new_instruction.priority,
            "modification requested"
        );

        if let Err(err) = self
            .notifier
            .notify_revision_modification_requested(
                &updated,
                actor.id,
                updated.proposer_id,
                &instruction.instruction_text,
            )
            .await
        {
            tracing::warn!(error = %err, revision_id = %revision_id, "modification-request notification failed");
        }

        Ok(updated)
    }

    /// The audit trail, visible to admins, reviewers, and the proposer.
    pub async fn get_approval_history(
        &self,
        revision_id: Uuid,
        actor: &Actor,
    ) -> Result<Vec<ApprovalHistory>, CoreError> {
        let revision = self.load(revision_id).await?;
        let visible =
            actor.is_admin() || actor.is_reviewer() || revision.proposer_id == actor.id;
        if !visible {
            return Err(CoreError::Forbidden(
                "no permission to view approval history".to_string(),
            ));
        }
        Ok(self.history.list_for_revision(revision_id).await?)
    }

    /// Dashboard counts for reviewer-level roles; all zeros otherwise.
    pub async fn get_revision_status_counts(
        &self,
        actor: &Actor,
    ) -> Result<StatusCounts, CoreError> {
        if !actor.can_review() {
            return Ok(StatusCounts::default());
        }
        Ok(self.revisions.status_counts().await?)
    }
}
