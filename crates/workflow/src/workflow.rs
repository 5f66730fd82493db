//! The workflow engine: bare status transitions.
//!
//! Validation is two-layered and the order matters: the structural check
//! against the transition table rejects impossible moves for every actor
//! (admins included), then the permission matrix gates who may perform a
//! structurally valid move. Audit records and notifications are the
//! caller's responsibility — see [`ApprovalService`](crate::ApprovalService).

use std::sync::Arc;

use ringi_core::error::CoreError;
use ringi_core::permissions;
use ringi_core::role::Actor;
use ringi_core::status::RevisionStatus;
use uuid::Uuid;

use ringi_db::models::revision::{ApprovalStamp, Revision};
use ringi_db::store::{RevisionStore, StoreError};

use crate::revision_not_found;

pub struct WorkflowService {
    revisions: Arc<dyn RevisionStore>,
}

impl WorkflowService {
    pub fn new(revisions: Arc<dyn RevisionStore>) -> Self {
        Self { revisions }
    }

    /// Whether `current -> new` is in the transition table.
    pub fn validate_state_transition(current: RevisionStatus, new: RevisionStatus) -> bool {
        current.can_transition_to(new)
    }

    /// States reachable from `current`.
    pub fn allowed_transitions(current: RevisionStatus) -> &'static [RevisionStatus] {
        current.allowed_transitions()
    }

    /// Probe whether the actor could move the revision to `new_status`.
    ///
    /// Returns `(allowed, reason-when-denied)` without mutating anything.
    pub async fn can_transition_to_status(
        &self,
        revision_id: Uuid,
        new_status: RevisionStatus,
        actor: &Actor,
    ) -> Result<(bool, Option<String>), CoreError> {
        let Some(revision) = self.revisions.get(revision_id).await?
        else {
            return Ok((false, Some("revision not found".to_string())));
        };
        let meta = revision.meta()?;

        if !Self::validate_state_transition(meta.status, new_status) {
            return Ok((
                false,
                Some(format!(
                    "transition from {} to {new_status} is invalid",
                    meta.status
                )),
            ));
        }

        let decision = permissions::transition_permission(actor, &meta, new_status);
        Ok((decision.allowed, decision.reason))
    }

    /// Move a revision to `new_status` on behalf of `actor`.
    ///
    /// Fails with `NotFound` when the revision does not exist,
    /// `InvalidState` when the move is not in the transition table, and
    /// `Forbidden` when the matrix denies the actor. On a transition to
    /// `Approved` the approver id, timestamp, and comment are stamped
    /// onto the revision.
    pub async fn transition_status(
        &self,
        revision_id: Uuid,
        new_status: RevisionStatus,
        actor: &Actor,
        comment: Option<&str>,
    ) -> Result<Revision, CoreError> {
        let revision = self
            .revisions
            .get(revision_id)
            .await?
            .ok_or_else(|| revision_not_found(revision_id))?;
        let meta = revision.meta()?;

        if !Self::validate_state_transition(meta.status, new_status) {
            return Err(CoreError::InvalidState(format!(
                "transition from {} to {new_status} is invalid",
                meta.status
            )));
        }

        let decision = permissions::transition_permission(actor, &meta, new_status);
        if !decision.allowed {
            return Err(CoreError::Forbidden(
                decision.reason.unwrap_or_else(|| "no permission for this transition".to_string()),
            ));
        }

        let stamp = (new_status == RevisionStatus::Approved).then(|| ApprovalStamp {
            approver_id: actor.id,
            approved_at: chrono::Utc::now(),
            comment: comment.map(str::to_string),
        });

        let updated = self
            .revisions
            .update_status(revision_id, new_status, stamp.as_ref())
            .await
            .map_err(|e| match e {
                StoreError::RowNotFound => revision_not_found(revision_id),
                other => other.into(),
            })?;

        tracing::info!(
            revision_id = %revision_id,
            from_status = %meta.status,
            to_status = %new_status,
            actor_id = %actor.id,
            actor_role = %actor.role,
            "revision status transitioned"
        );

        Ok(updated)
    }
}
