//! Orchestration services for the revision-approval workflow.
//!
//! Each service receives its store and notifier collaborators through its
//! constructor; nothing here holds process-wide state. The services
//! compose the pure rules from `ringi-core` with the store contracts from
//! `ringi-db`:
//!
//! - [`WorkflowService`] — bare status transitions against the
//!   state-machine table.
//! - [`ApprovalService`] — approve/reject/withdraw/request-modification
//!   with audit records and best-effort notifications.
//! - [`RevisionService`] — revision CRUD, optimistic content edits, and
//!   diff computation.
//! - [`EditHistoryService`] — the versioned edit trail and version diffs.
//! - [`InstructionService`] — modification instructions.

pub mod approval;
pub mod edit_history;
pub mod instruction;
pub mod revision;
pub mod workflow;

pub use approval::ApprovalService;
pub use edit_history::{EditHistoryService, VersionDiff};
pub use instruction::InstructionService;
pub use revision::{RevisionDetailDiff, RevisionService};
pub use workflow::WorkflowService;

use ringi_core::error::CoreError;
use uuid::Uuid;

/// Standard not-found error for a revision id.
pub(crate) fn revision_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound { entity: "revision", id: id.to_string() }
}
