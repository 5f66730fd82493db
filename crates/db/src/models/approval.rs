//! Approval-history audit records.

use ringi_core::action::ApprovalAction;
use ringi_core::error::CoreError;
use ringi_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `approval_histories` table. Written once, never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalHistory {
    pub id: Uuid,
    pub revision_id: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

impl ApprovalHistory {
    /// Parse the stored action string.
    pub fn action(&self) -> Result<ApprovalAction, CoreError> {
        ApprovalAction::parse(&self.action)
            .ok_or_else(|| CoreError::Internal(format!("unknown approval action '{}'", self.action)))
    }
}

/// Insert payload for a new audit record.
#[derive(Debug, Clone)]
pub struct NewApprovalRecord {
    pub revision_id: Uuid,
    pub actor_id: Uuid,
    pub action: ApprovalAction,
    pub comment: Option<String>,
}

impl NewApprovalRecord {
    pub fn new(revision_id: Uuid, actor_id: Uuid, action: ApprovalAction) -> Self {
        Self { revision_id, actor_id, action, comment: None }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
