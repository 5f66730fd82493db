//! User roles and the authenticated principal consumed by the matrix.
//!
//! Authentication happens outside this workspace; the core only ever sees
//! an already-resolved [`Actor`].

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    General,
    Supervisor,
    Approver,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Self::General, Self::Supervisor, Self::Approver, Self::Admin];

    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Supervisor => "supervisor",
            Self::Approver => "approver",
            Self::Admin => "admin",
        }
    }

    /// Parse the canonical snake_case encoding back into a role.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.as_str() == s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated principal: id, role, and the supervisor flag.
///
/// `is_sv` grants supervisor-equivalent privileges regardless of `role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    pub is_sv: bool,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role, is_sv: false }
    }

    pub fn with_supervisor_flag(id: UserId, role: Role) -> Self {
        Self { id, role, is_sv: true }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Approver- or supervisor-level privileges, via role or the `is_sv` flag.
    ///
    /// Admin is not implied here; matrix rules short-circuit on admin first.
    pub fn is_reviewer(&self) -> bool {
        matches!(self.role, Role::Approver | Role::Supervisor) || self.is_sv
    }

    /// May act on approve/reject/request-modification operations.
    pub fn can_review(&self) -> bool {
        self.is_admin() || self.is_reviewer()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
