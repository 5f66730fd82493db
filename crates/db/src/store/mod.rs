//! Store contracts consumed by the orchestration services.
//!
//! Each trait abstracts one aggregate's persistence so backends can be
//! swapped (Postgres in production, in-memory doubles in tests). The
//! compound operations on [`RevisionStore`] exist because a workflow
//! mutation and its audit record must commit or roll back together; a
//! backend implements each of them as a single transaction.

pub mod postgres;

pub use postgres::{
    PgApprovalHistoryStore, PgArticleStore, PgEditHistoryStore, PgInstructionStore,
    PgNotificationStore, PgRevisionStore, PgUserStore,
};

use async_trait::async_trait;
use ringi_core::error::CoreError;
use ringi_core::status::RevisionStatus;
use ringi_core::types::Timestamp;
use uuid::Uuid;

use crate::models::approval::{ApprovalHistory, NewApprovalRecord};
use crate::models::article::Article;
use crate::models::edit_history::{NewEditRecord, RevisionEditHistory};
use crate::models::instruction::{NewInstruction, RevisionInstruction};
use crate::models::notification::{NewNotification, Notification};
use crate::models::revision::{
    ApprovalStamp, NewRevision, Revision, RevisionFilter, StatusCounts,
};
use crate::models::user::User;

/// Failures surfaced by store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The targeted row disappeared between load and mutation.
    #[error("row not found")]
    RowNotFound,

    /// The single-active-revision invariant blocked an insert.
    #[error("an active revision already exists for article {0}")]
    ActiveRevisionExists(String),

    /// An optimistic edit presented a stale version marker.
    #[error("stale revision version: expected {expected}, found {found}")]
    StaleVersion { expected: i32, found: i32 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RowNotFound => {
                CoreError::Internal("row vanished during a store operation".to_string())
            }
            StoreError::ActiveRevisionExists(article_id) => CoreError::Conflict(format!(
                "an active revision already exists for article {article_id}"
            )),
            StoreError::StaleVersion { expected, found } => CoreError::Conflict(format!(
                "revision was modified concurrently: expected version {expected}, found {found}"
            )),
            StoreError::Database(e) => CoreError::Internal(e.to_string()),
        }
    }
}

/// Persistence for revisions, including the compound workflow mutations.
#[async_trait]
pub trait RevisionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Revision>, StoreError>;

    /// Insert a new draft revision at version 1.
    ///
    /// Must enforce the single-active-revision invariant inside the
    /// inserting statement/transaction and report
    /// [`StoreError::ActiveRevisionExists`] when it is violated.
    async fn create(&self, new: NewRevision) -> Result<Revision, StoreError>;

    async fn list(
        &self,
        filter: &RevisionFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Revision>, StoreError>;

    /// Hard-delete a revision row. Returns `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Whether an active revision exists for the article, optionally
    /// excluding one revision id.
    async fn exists_active(
        &self,
        article_id: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, StoreError>;

    /// Bare status mutation (submit/resubmit), no audit record.
    async fn update_status(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
    ) -> Result<Revision, StoreError>;

    /// Status mutation plus its approval-history record, atomically.
    async fn apply_transition(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
        audit: &NewApprovalRecord,
    ) -> Result<Revision, StoreError>;

    /// The request-modification compound: status to RevisionRequested,
    /// the audit record, and the companion instruction, atomically.
    async fn apply_modification_request(
        &self,
        id: Uuid,
        audit: &NewApprovalRecord,
        instruction: &NewInstruction,
    ) -> Result<Revision, StoreError>;

    /// Optimistic content edit: overwrite the `after_*` columns and
    /// reason, bump `version`, and append the edit-history record,
    /// atomically. Fails with [`StoreError::StaleVersion`] when the
    /// stored version no longer equals `expected_version`.
    async fn apply_content_edit(
        &self,
        id: Uuid,
        expected_version: i32,
        reason: &str,
        after: &ringi_core::fields::FieldValues,
        edit: &NewEditRecord,
    ) -> Result<Revision, StoreError>;

    /// Counts of revisions grouped by review-related status.
    async fn status_counts(&self) -> Result<StatusCounts, StoreError>;
}

/// Append-only edit history.
#[async_trait]
pub trait EditHistoryStore: Send + Sync {
    async fn append(&self, edit: &NewEditRecord) -> Result<RevisionEditHistory, StoreError>;

    /// Records for one revision, oldest first.
    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionEditHistory>, StoreError>;
}

/// Read access to the approval audit trail (writes ride the compound
/// revision operations).
#[async_trait]
pub trait ApprovalHistoryStore: Send + Sync {
    /// Records for one revision, newest first.
    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<ApprovalHistory>, StoreError>;
}

/// Modification instructions.
#[async_trait]
pub trait InstructionStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<RevisionInstruction>, StoreError>;

    async fn create(&self, new: &NewInstruction) -> Result<RevisionInstruction, StoreError>;

    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError>;

    async fn list_unresolved(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError>;

    /// Mark an instruction resolved. Returns `None` when it does not exist.
    async fn resolve(
        &self,
        id: Uuid,
        comment: Option<&str>,
        resolved_at: Timestamp,
    ) -> Result<Option<RevisionInstruction>, StoreError>;
}

/// Read-only article lookup.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn get_by_article_id(&self, article_id: &str) -> Result<Option<Article>, StoreError>;
}

/// User lookup for principals and the approver notification set.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Active users with reviewer-level privileges (approver or
    /// supervisor role, or the supervisor flag).
    async fn list_approvers(&self) -> Result<Vec<User>, StoreError>;
}

/// Persisted notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, new: &NewNotification) -> Result<Notification, StoreError>;

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Returns `true` if the notification belonged to the recipient and
    /// was newly marked read.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool, StoreError>;

    /// Returns the number of notifications marked read.
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError>;

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError>;
}
