//! Role-based permission matrix for revision actions.
//!
//! Pure decision functions of shape `(actor, revision) -> Decision`. No
//! side effects, no I/O. Precedence is fixed: admin short-circuits every
//! rule, then proposer/reviewer relationships are consulted per status.
//!
//! [`available_actions`] must stay derivable purely from the individual
//! predicates — the orchestration layer relies on that symmetry.

use crate::action::RevisionAction;
use crate::role::Actor;
use crate::status::RevisionStatus;
use crate::types::UserId;

/// The minimal slice of a revision the matrix needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionMeta {
    pub proposer_id: UserId,
    pub status: RevisionStatus,
}

impl RevisionMeta {
    pub fn new(proposer_id: UserId, status: RevisionStatus) -> Self {
        Self { proposer_id, status }
    }
}

/// Outcome of a permission check: allowed, or denied with a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl Decision {
    fn allow() -> Self {
        Self { allowed: true, reason: None }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self { allowed: false, reason: Some(reason.into()) }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}

/// Statuses a reviewer may inspect even without owning the revision.
const REVIEWER_VISIBLE: [RevisionStatus; 4] = [
    RevisionStatus::UnderReview,
    RevisionStatus::RevisionRequested,
    RevisionStatus::Approved,
    RevisionStatus::Rejected,
];

/// View: admin, the proposer, reviewers on review-related statuses, and
/// anyone once the revision is approved.
pub fn can_view(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if actor.is_admin() {
        return Decision::allow();
    }
    if actor.id == revision.proposer_id {
        return Decision::allow();
    }
    if actor.is_reviewer() && REVIEWER_VISIBLE.contains(&revision.status) {
        return Decision::allow();
    }
    if revision.status == RevisionStatus::Approved {
        return Decision::allow();
    }
    Decision::deny("no permission to view this revision")
}

/// Edit: who may change content depends entirely on the current status.
pub fn can_edit(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if actor.is_admin() {
        return Decision::allow();
    }
    match revision.status {
        RevisionStatus::Draft => {
            if actor.id == revision.proposer_id {
                Decision::allow()
            } else {
                Decision::deny("only the proposer may edit a draft revision")
            }
        }
        RevisionStatus::UnderReview => {
            if actor.is_reviewer() {
                Decision::allow()
            } else {
                Decision::deny("revisions under review may only be edited by approvers")
            }
        }
        RevisionStatus::RevisionRequested => {
            if actor.id == revision.proposer_id || actor.is_reviewer() {
                Decision::allow()
            } else {
                Decision::deny(
                    "revisions awaiting modification may only be edited by the proposer or approvers",
                )
            }
        }
        status => Decision::deny(format!("cannot edit revision in status {status}")),
    }
}

/// Delete: drafts only, and only by their proposer.
pub fn can_delete(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if actor.is_admin() {
        return Decision::allow();
    }
    if revision.status != RevisionStatus::Draft {
        return Decision::deny("only draft revisions may be deleted");
    }
    if actor.id == revision.proposer_id {
        return Decision::allow();
    }
    Decision::deny("only the proposer may delete a revision")
}

/// Approve: reviewer-level role, revision under review or awaiting changes.
pub fn can_approve(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if !actor.can_review() {
        return Decision::deny("no approval permission");
    }
    if !matches!(
        revision.status,
        RevisionStatus::UnderReview | RevisionStatus::RevisionRequested
    ) {
        return Decision::deny(format!(
            "cannot approve revision in status {}",
            revision.status
        ));
    }
    Decision::allow()
}

/// Reject: same gate as approve, with its own denial messages.
pub fn can_reject(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if !actor.can_review() {
        return Decision::deny("no rejection permission");
    }
    if !matches!(
        revision.status,
        RevisionStatus::UnderReview | RevisionStatus::RevisionRequested
    ) {
        return Decision::deny(format!(
            "cannot reject revision in status {}",
            revision.status
        ));
    }
    Decision::allow()
}

/// Request modification: reviewer-level role, revision exactly under review.
pub fn can_request_modification(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if !actor.can_review() {
        return Decision::deny("no modification request permission");
    }
    if revision.status != RevisionStatus::UnderReview {
        return Decision::deny(format!(
            "cannot request modification for revision in status {}",
            revision.status
        ));
    }
    Decision::allow()
}

/// Submit (and resubmit): the proposer or an admin, from Draft or
/// RevisionRequested.
pub fn can_submit(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if actor.is_admin() || actor.id == revision.proposer_id {
        if matches!(
            revision.status,
            RevisionStatus::Draft | RevisionStatus::RevisionRequested
        ) {
            return Decision::allow();
        }
        return Decision::deny(format!(
            "cannot submit revision in status {}",
            revision.status
        ));
    }
    Decision::deny("only the proposer may submit a revision")
}

/// Withdraw: the proposer or an admin, while the revision is still active.
pub fn can_withdraw(actor: &Actor, revision: &RevisionMeta) -> Decision {
    if actor.is_admin() || actor.id == revision.proposer_id {
        if revision.status.is_active() {
            return Decision::allow();
        }
        return Decision::deny(format!(
            "cannot withdraw revision in status {}",
            revision.status
        ));
    }
    Decision::deny("only the proposer may withdraw a revision")
}

/// Evaluate a single action through the matrix.
pub fn check(action: RevisionAction, actor: &Actor, revision: &RevisionMeta) -> Decision {
    match action {
        RevisionAction::View => can_view(actor, revision),
        RevisionAction::Edit => can_edit(actor, revision),
        RevisionAction::Delete => can_delete(actor, revision),
        RevisionAction::Submit => can_submit(actor, revision),
        RevisionAction::Withdraw => can_withdraw(actor, revision),
        RevisionAction::Approve => can_approve(actor, revision),
        RevisionAction::Reject => can_reject(actor, revision),
        RevisionAction::RequestModification => can_request_modification(actor, revision),
    }
}

/// The subset of actions the actor may currently perform.
pub fn available_actions(actor: &Actor, revision: &RevisionMeta) -> Vec<RevisionAction> {
    RevisionAction::ALL
        .into_iter()
        .filter(|action| check(*action, actor, revision).is_allowed())
        .collect()
}

/// Permission check for a specific structural transition.
///
/// Callers must have already verified `from -> to` against the transition
/// table; this maps each table edge to the matrix rule that gates it.
pub fn transition_permission(
    actor: &Actor,
    revision: &RevisionMeta,
    to: RevisionStatus,
) -> Decision {
    match (revision.status, to) {
        (RevisionStatus::Draft, RevisionStatus::UnderReview)
        | (RevisionStatus::RevisionRequested, RevisionStatus::UnderReview) => {
            can_submit(actor, revision)
        }
        (RevisionStatus::Draft, RevisionStatus::Withdrawn) => can_withdraw(actor, revision),
        (RevisionStatus::UnderReview, RevisionStatus::Approved) => can_approve(actor, revision),
        (RevisionStatus::UnderReview, RevisionStatus::Rejected) => can_reject(actor, revision),
        (RevisionStatus::UnderReview, RevisionStatus::RevisionRequested) => {
            can_request_modification(actor, revision)
        }
        (from, to) => Decision::deny(format!("no permission rule for transition {from} -> {to}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
