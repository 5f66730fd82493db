//! Revision lifecycle states and the transition table.
//!
//! The table in [`RevisionStatus::allowed_transitions`] is the single
//! source of truth for structural validity; both the workflow engine and
//! the permission matrix consume it. Terminal states have no outbound
//! transitions for any role, including admins.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionStatus {
    Draft,
    UnderReview,
    RevisionRequested,
    Approved,
    Rejected,
    Withdrawn,
}

impl RevisionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [RevisionStatus; 6] = [
        Self::Draft,
        Self::UnderReview,
        Self::RevisionRequested,
        Self::Approved,
        Self::Rejected,
        Self::Withdrawn,
    ];

    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::RevisionRequested => "revision_requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parse the canonical snake_case encoding back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    /// States reachable from `self` through the workflow engine.
    ///
    /// | From              | To                                       |
    /// |-------------------|------------------------------------------|
    /// | Draft             | UnderReview (submit), Withdrawn          |
    /// | UnderReview       | Approved, Rejected, RevisionRequested    |
    /// | RevisionRequested | UnderReview (resubmit)                   |
    /// | terminal states   | —                                        |
    pub fn allowed_transitions(self) -> &'static [RevisionStatus] {
        match self {
            Self::Draft => &[Self::UnderReview, Self::Withdrawn],
            Self::UnderReview => &[Self::Approved, Self::Rejected, Self::RevisionRequested],
            Self::RevisionRequested => &[Self::UnderReview],
            Self::Approved | Self::Rejected | Self::Withdrawn => &[],
        }
    }

    /// Whether `self -> to` is in the transition table.
    pub fn can_transition_to(self, to: RevisionStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Terminal states never transition again.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Active states count toward the one-active-revision-per-article limit.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Draft | Self::UnderReview | Self::RevisionRequested)
    }
}

impl std::fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
