//! Workflow notification dispatch.
//!
//! [`Notifier`] is the contract the orchestration services call at the
//! end of each workflow action. Dispatch is best-effort by policy: the
//! caller logs a failure and moves on, it never rolls back the committed
//! transition.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ringi_core::fields::FieldChange;
use ringi_core::types::UserId;
use serde_json::json;

use ringi_db::models::notification::NewNotification;
use ringi_db::models::revision::Revision;
use ringi_db::models::user::User;
use ringi_db::store::{NotificationStore, StoreError};

use crate::bus::{EventBus, WorkflowEvent};

/// Known notification type names.
pub mod notification_types {
    pub const REVISION_CREATED: &str = "revision_created";
    pub const REVISION_SUBMITTED: &str = "revision_submitted";
    pub const REVISION_EDITED: &str = "revision_edited";
    pub const REVISION_APPROVED: &str = "revision_approved";
    pub const REVISION_REJECTED: &str = "revision_rejected";
    pub const REVISION_MODIFICATION_REQUESTED: &str = "revision_modification_requested";
    pub const COMMENT_ADDED: &str = "comment_added";
}

/// Failures surfaced by notifier implementations.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Best-effort notification contract for workflow events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the approver set a new revision exists.
    async fn notify_revision_created(
        &self,
        revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError>;

    /// Tell the approver set a revision is awaiting review.
    async fn notify_revision_submitted(
        &self,
        revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError>;

    /// Tell the recipient (usually the proposer) an approver edited the
    /// revision content.
    async fn notify_revision_edited(
        &self,
        revision: &Revision,
        editor_id: UserId,
        recipient_id: UserId,
        changes: &BTreeMap<String, FieldChange>,
    ) -> Result<(), NotifyError>;

    /// Tell the recipient the revision was approved.
    async fn notify_revision_approved(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
    ) -> Result<(), NotifyError>;

    /// Tell the recipient the revision was rejected.
    async fn notify_revision_rejected(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
        reason: Option<&str>,
    ) -> Result<(), NotifyError>;

    /// Tell the recipient an approver requested modifications.
    async fn notify_revision_modification_requested(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
        instruction_text: &str,
    ) -> Result<(), NotifyError>;

    /// Tell the recipient someone commented on the revision.
    async fn notify_comment_added(
        &self,
        revision: &Revision,
        commenter_id: UserId,
        recipient_id: UserId,
        comment: &str,
    ) -> Result<(), NotifyError>;
}

/// Persists one notification row per recipient and mirrors each onto the
/// event bus.
pub struct EventNotifier {
    notifications: Arc<dyn NotificationStore>,
    bus: Arc<EventBus>,
}

impl EventNotifier {
    pub fn new(notifications: Arc<dyn NotificationStore>, bus: Arc<EventBus>) -> Self {
        Self { notifications, bus }
    }

    /// The title shown for a revision: the proposed one when present,
    /// otherwise the snapshot.
    fn display_title(revision: &Revision) -> &str {
        revision
            .after_title
            .as_deref()
            .or(revision.before_title.as_deref())
            .unwrap_or("(untitled)")
    }

    async fn dispatch(
        &self,
        revision: &Revision,
        recipient_id: UserId,
        actor_id: Option<UserId>,
        notification_type: &str,
        title: String,
        body: String,
        payload: serde_json::Value,
    ) -> Result<(), NotifyError> {
        self.notifications
            .create(&NewNotification {
                recipient_id,
                notification_type: notification_type.to_string(),
                revision_id: Some(revision.id),
                title,
                body,
                payload: payload.clone(),
            })
            .await?;

        let mut event = WorkflowEvent::new(notification_type)
            .with_revision(revision.id)
            .with_recipient(recipient_id)
            .with_payload(payload);
        if let Some(actor_id) = actor_id {
            event = event.with_actor(actor_id);
        }
        self.bus.publish(event);
        tracing::debug!(
            notification_type,
            revision_id = %revision.id,
            recipient_id = %recipient_id,
            "notification dispatched"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for EventNotifier {
    async fn notify_revision_created(
        &self,
        revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError> {
        for approver in approvers {
            self.dispatch(
                revision,
                approver.id,
                Some(revision.proposer_id),
                notification_types::REVISION_CREATED,
                "A new revision has been created".to_string(),
                format!(
                    "Revision \"{}\" was created for article {}.",
                    Self::display_title(revision),
                    revision.target_article_id
                ),
                json!({
                    "proposer_id": revision.proposer_id,
                    "target_article_id": revision.target_article_id,
                }),
            )
            .await?;
        }
        Ok(())
    }

    async fn notify_revision_submitted(
        &self,
        revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError> {
        for approver in approvers {
            self.dispatch(
                revision,
                approver.id,
                Some(revision.proposer_id),
                notification_types::REVISION_SUBMITTED,
                "A revision is awaiting review".to_string(),
                format!(
                    "Revision \"{}\" has been submitted for review.",
                    Self::display_title(revision)
                ),
                json!({
                    "proposer_id": revision.proposer_id,
                    "target_article_id": revision.target_article_id,
                }),
            )
            .await?;
        }
        Ok(())
    }

    async fn notify_revision_edited(
        &self,
        revision: &Revision,
        editor_id: UserId,
        recipient_id: UserId,
        changes: &BTreeMap<String, FieldChange>,
    ) -> Result<(), NotifyError> {
        let changed_fields: Vec<&str> = changes.keys().map(String::as_str).collect();
        self.dispatch(
            revision,
            recipient_id,
            Some(editor_id),
            notification_types::REVISION_EDITED,
            "Your revision has been edited".to_string(),
            format!(
                "Revision \"{}\" was edited by a reviewer.",
                Self::display_title(revision)
            ),
            json!({
                "editor_id": editor_id,
                "changed_fields": changed_fields,
                "target_article_id": revision.target_article_id,
            }),
        )
        .await
    }

    async fn notify_revision_approved(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
    ) -> Result<(), NotifyError> {
        self.dispatch(
            revision,
            recipient_id,
            Some(approver_id),
            notification_types::REVISION_APPROVED,
            "Your revision has been approved".to_string(),
            format!(
                "Revision \"{}\" was approved.",
                Self::display_title(revision)
            ),
            json!({
                "approver_id": approver_id,
                "target_article_id": revision.target_article_id,
                "approval_comment": revision.approval_comment,
            }),
        )
        .await
    }

    async fn notify_revision_rejected(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
        reason: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.dispatch(
            revision,
            recipient_id,
            Some(approver_id),
            notification_types::REVISION_REJECTED,
            "Your revision has been rejected".to_string(),
            format!(
                "Revision \"{}\" was rejected.",
                Self::display_title(revision)
            ),
            json!({
                "approver_id": approver_id,
                "target_article_id": revision.target_article_id,
                "rejection_reason": reason,
            }),
        )
        .await
    }

    async fn notify_revision_modification_requested(
        &self,
        revision: &Revision,
        approver_id: UserId,
        recipient_id: UserId,
        instruction_text: &str,
    ) -> Result<(), NotifyError> {
        self.dispatch(
            revision,
            recipient_id,
            Some(approver_id),
            notification_types::REVISION_MODIFICATION_REQUESTED,
            "Changes requested on your revision".to_string(),
            format!(
                "A reviewer requested changes to revision \"{}\".",
                Self::display_title(revision)
            ),
            json!({
                "approver_id": approver_id,
                "target_article_id": revision.target_article_id,
                "instruction_text": instruction_text,
            }),
        )
        .await
    }

    async fn notify_comment_added(
        &self,
        revision: &Revision,
        commenter_id: UserId,
        recipient_id: UserId,
        comment: &str,
    ) -> Result<(), NotifyError> {
        self.dispatch(
            revision,
            recipient_id,
            Some(commenter_id),
            notification_types::COMMENT_ADDED,
            "New comment on your revision".to_string(),
            format!(
                "A comment was added to revision \"{}\".",
                Self::display_title(revision)
            ),
            json!({
                "commenter_id": commenter_id,
                "target_article_id": revision.target_article_id,
                "comment_text": comment,
            }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
