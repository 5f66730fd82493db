//! Closed action vocabularies for the audit trail and the permission matrix.

use serde::{Deserialize, Serialize};

/// The state-changing actions recorded in the approval history.
///
/// Submit and resubmit are deliberately absent: they move a revision back
/// into review but leave no audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approved,
    Rejected,
    RevisionRequested,
    Withdrawn,
}

impl ApprovalAction {
    pub const ALL: [ApprovalAction; 4] = [
        Self::Approved,
        Self::Rejected,
        Self::RevisionRequested,
        Self::Withdrawn,
    ];

    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::RevisionRequested => "revision_requested",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parse the canonical snake_case encoding back into an action.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.as_str() == s)
    }
}

impl std::fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an actor can do to a revision, as evaluated by the matrix.
///
/// Drives client-side action visibility via
/// [`permissions::available_actions`](crate::permissions::available_actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionAction {
    View,
    Edit,
    Delete,
    Submit,
    Withdraw,
    Approve,
    Reject,
    RequestModification,
}

impl RevisionAction {
    /// Evaluation order used when listing available actions.
    pub const ALL: [RevisionAction; 8] = [
        Self::View,
        Self::Edit,
        Self::Delete,
        Self::Submit,
        Self::Withdraw,
        Self::Approve,
        Self::Reject,
        Self::RequestModification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Submit => "submit",
            Self::Withdraw => "withdraw",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestModification => "request_modification",
        }
    }
}

impl std::fmt::Display for RevisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
