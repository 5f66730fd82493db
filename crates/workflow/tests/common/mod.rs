//! Shared harness for the workflow integration tests.
//!
//! `MemStore` implements every store contract over a single `RwLock`ed
//! state so the compound operations keep their all-or-nothing semantics,
//! and the services can be exercised without a database.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use ringi_core::fields::{FieldChange, FieldValues};
use ringi_core::role::{Actor, Role};
use ringi_core::status::RevisionStatus;
use ringi_core::types::{Timestamp, UserId};

use ringi_db::models::approval::{ApprovalHistory, NewApprovalRecord};
use ringi_db::models::article::Article;
use ringi_db::models::edit_history::{NewEditRecord, RevisionEditHistory};
use ringi_db::models::instruction::{NewInstruction, RevisionInstruction};
use ringi_db::models::notification::{NewNotification, Notification};
use ringi_db::models::revision::{
    ApprovalStamp, NewRevision, Revision, RevisionFilter, StatusCounts,
};
use ringi_db::models::user::User;
use ringi_db::store::{
    ApprovalHistoryStore, ArticleStore, EditHistoryStore, InstructionStore, NotificationStore,
    RevisionStore, StoreError, UserStore,
};
use ringi_events::{Notifier, NotifyError};

use ringi_workflow::{
    ApprovalService, EditHistoryService, InstructionService, RevisionService, WorkflowService,
};

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemState {
    articles: HashMap<String, Article>,
    users: HashMap<Uuid, User>,
    revisions: HashMap<Uuid, Revision>,
    edits: Vec<RevisionEditHistory>,
    approvals: Vec<ApprovalHistory>,
    instructions: Vec<RevisionInstruction>,
    notifications: Vec<Notification>,
}

/// All store contracts over one lock.
#[derive(Default)]
pub struct MemStore {
    state: RwLock<MemState>,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed_article(&self, article: Article) {
        self.state
            .write()
            .await
            .articles
            .insert(article.article_id.clone(), article);
    }

    pub async fn seed_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Fetch a revision that is expected to exist.
    pub async fn get_revision(&self, revision_id: Uuid) -> Revision {
        self.state
            .read()
            .await
            .revisions
            .get(&revision_id)
            .cloned()
            .expect("revision should exist")
    }

    /// Direct status override for test setup.
    pub async fn force_status(&self, revision_id: Uuid, status: RevisionStatus) {
        let mut state = self.state.write().await;
        if let Some(revision) = state.revisions.get_mut(&revision_id) {
            revision.status = status.as_str().to_string();
        }
    }

    pub async fn approval_records(&self, revision_id: Uuid) -> Vec<ApprovalHistory> {
        self.state
            .read()
            .await
            .approvals
            .iter()
            .filter(|record| record.revision_id == revision_id)
            .cloned()
            .collect()
    }

    pub async fn edit_records(&self, revision_id: Uuid) -> Vec<RevisionEditHistory> {
        self.state
            .read()
            .await
            .edits
            .iter()
            .filter(|record| record.revision_id == revision_id)
            .cloned()
            .collect()
    }

    pub async fn instructions_for(&self, revision_id: Uuid) -> Vec<RevisionInstruction> {
        self.state
            .read()
            .await
            .instructions
            .iter()
            .filter(|row| row.revision_id == revision_id)
            .cloned()
            .collect()
    }

    fn build_revision(new: &NewRevision, now: Timestamp) -> Revision {
        let before = &new.before;
        let after = &new.after;
        Revision {
            id: Uuid::new_v4(),
            target_article_id: new.target_article_id.clone(),
            proposer_id: new.proposer_id,
            status: RevisionStatus::Draft.as_str().to_string(),
            reason: new.reason.clone(),
            before_title: before.title.clone(),
            after_title: after.title.clone(),
            before_info_category: before.info_category.clone(),
            after_info_category: after.info_category.clone(),
            before_keywords: before.keywords.clone(),
            after_keywords: after.keywords.clone(),
            before_importance: before.importance,
            after_importance: after.importance,
            before_target: before.target.clone(),
            after_target: after.target.clone(),
            before_question: before.question.clone(),
            after_question: after.question.clone(),
            before_answer: before.answer.clone(),
            after_answer: after.answer.clone(),
            before_additional_comment: before.additional_comment.clone(),
            after_additional_comment: after.additional_comment.clone(),
            before_publish_start: before.publish_start,
            after_publish_start: after.publish_start,
            before_publish_end: before.publish_end,
            after_publish_end: after.publish_end,
            version: 1,
            approver_id: None,
            approved_at: None,
            approval_comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_status(
        revision: &mut Revision,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
        now: Timestamp,
    ) {
        revision.status = to.as_str().to_string();
        revision.updated_at = now;
        if let Some(stamp) = stamp {
            revision.approver_id = Some(stamp.approver_id);
            revision.approved_at = Some(stamp.approved_at);
            revision.approval_comment = stamp.comment.clone();
        }
    }

    fn audit_row(audit: &NewApprovalRecord, now: Timestamp) -> ApprovalHistory {
        ApprovalHistory {
            id: Uuid::new_v4(),
            revision_id: audit.revision_id,
            actor_id: audit.actor_id,
            action: audit.action.as_str().to_string(),
            comment: audit.comment.clone(),
            created_at: now,
        }
    }

    fn edit_row(edit: &NewEditRecord, now: Timestamp) -> RevisionEditHistory {
        RevisionEditHistory {
            id: Uuid::new_v4(),
            revision_id: edit.revision_id,
            editor_id: edit.editor_id,
            editor_role: edit.editor_role.as_str().to_string(),
            changes: edit.changes_json(),
            comment: edit.comment.clone(),
            version_before: edit.version_before,
            version_after: edit.version_after,
            edited_at: now,
        }
    }

    fn instruction_row(new: &NewInstruction, now: Timestamp) -> RevisionInstruction {
        RevisionInstruction {
            id: Uuid::new_v4(),
            revision_id: new.revision_id,
            instructor_id: new.instructor_id,
            instruction_text: new.instruction_text.clone(),
            required_fields: new.required_fields_json(),
            priority: new.priority.as_str().to_string(),
            due_date: new.due_date,
            resolved_at: None,
            resolution_comment: None,
            created_at: now,
        }
    }
}

#[async_trait]
impl RevisionStore for MemStore {
    async fn get(&self, id: Uuid) -> Result<Option<Revision>, StoreError> {
        Ok(self.state.read().await.revisions.get(&id).cloned())
    }

    async fn create(&self, new: NewRevision) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        let active_exists = state.revisions.values().any(|revision| {
            revision.target_article_id == new.target_article_id
                && RevisionStatus::parse(&revision.status).is_some_and(RevisionStatus::is_active)
        });
        if active_exists {
            return Err(StoreError::ActiveRevisionExists(new.target_article_id));
        }
        let revision = Self::build_revision(&new, Utc::now());
        state.revisions.insert(revision.id, revision.clone());
        Ok(revision)
    }

    async fn list(
        &self,
        filter: &RevisionFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Revision>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<Revision> = state
            .revisions
            .values()
            .filter(|r| {
                filter
                    .status
                    .is_none_or(|status| r.status == status.as_str())
                    && filter.proposer_id.is_none_or(|id| r.proposer_id == id)
                    && filter
                        .target_article_id
                        .as_ref()
                        .is_none_or(|article| &r.target_article_id == article)
                    && filter.created_after.is_none_or(|after| r.created_at >= after)
                    && filter.created_before.is_none_or(|before| r.created_at <= before)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.write().await.revisions.remove(&id).is_some())
    }

    async fn exists_active(
        &self,
        article_id: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let state = self.state.read().await;
        Ok(state.revisions.values().any(|revision| {
            revision.target_article_id == article_id
                && exclude_id != Some(revision.id)
                && RevisionStatus::parse(&revision.status).is_some_and(RevisionStatus::is_active)
        }))
    }

    async fn update_status(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
    ) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        let revision = state.revisions.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        Self::apply_status(revision, to, stamp, Utc::now());
        Ok(revision.clone())
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
        audit: &NewApprovalRecord,
    ) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let revision = state.revisions.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        Self::apply_status(revision, to, stamp, now);
        let updated = revision.clone();
        state.approvals.push(Self::audit_row(audit, now));
        Ok(updated)
    }

    async fn apply_modification_request(
        &self,
        id: Uuid,
        audit: &NewApprovalRecord,
        instruction: &NewInstruction,
    ) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let revision = state.revisions.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        Self::apply_status(revision, RevisionStatus::RevisionRequested, None, now);
        let updated = revision.clone();
        state.approvals.push(Self::audit_row(audit, now));
        state.instructions.push(Self::instruction_row(instruction, now));
        Ok(updated)
    }

    async fn apply_content_edit(
        &self,
        id: Uuid,
        expected_version: i32,
        reason: &str,
        after: &FieldValues,
        edit: &NewEditRecord,
    ) -> Result<Revision, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let revision = state.revisions.get_mut(&id).ok_or(StoreError::RowNotFound)?;
        if revision.version != expected_version {
            return Err(StoreError::StaleVersion {
                expected: expected_version,
                found: revision.version,
            });
        }
        revision.reason = reason.to_string();
        revision.after_title = after.title.clone();
        revision.after_info_category = after.info_category.clone();
        revision.after_keywords = after.keywords.clone();
        revision.after_importance = after.importance;
        revision.after_target = after.target.clone();
        revision.after_question = after.question.clone();
        revision.after_answer = after.answer.clone();
        revision.after_additional_comment = after.additional_comment.clone();
        revision.after_publish_start = after.publish_start;
        revision.after_publish_end = after.publish_end;
        revision.version += 1;
        revision.updated_at = now;
        let updated = revision.clone();
        state.edits.push(Self::edit_row(edit, now));
        Ok(updated)
    }

    async fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        let state = self.state.read().await;
        let mut counts = StatusCounts::default();
        for revision in state.revisions.values() {
            match revision.status.as_str() {
                "under_review" => counts.under_review += 1,
                "revision_requested" => counts.revision_requested += 1,
                "approved" => counts.approved += 1,
                "rejected" => counts.rejected += 1,
                _ => {}
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl EditHistoryStore for MemStore {
    async fn append(&self, edit: &NewEditRecord) -> Result<RevisionEditHistory, StoreError> {
        let mut state = self.state.write().await;
        let row = Self::edit_row(edit, Utc::now());
        state.edits.push(row.clone());
        Ok(row)
    }

    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionEditHistory>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .edits
            .iter()
            .filter(|record| record.revision_id == revision_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ApprovalHistoryStore for MemStore {
    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<ApprovalHistory>, StoreError> {
        let mut rows: Vec<ApprovalHistory> = self
            .state
            .read()
            .await
            .approvals
            .iter()
            .filter(|record| record.revision_id == revision_id)
            .cloned()
            .collect();
        rows.reverse();
        Ok(rows)
    }
}

#[async_trait]
impl InstructionStore for MemStore {
    async fn get(&self, id: Uuid) -> Result<Option<RevisionInstruction>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .instructions
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn create(&self, new: &NewInstruction) -> Result<RevisionInstruction, StoreError> {
        let mut state = self.state.write().await;
        let row = Self::instruction_row(new, Utc::now());
        state.instructions.push(row.clone());
        Ok(row)
    }

    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError> {
        Ok(self.instructions_for(revision_id).await)
    }

    async fn list_unresolved(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError> {
        Ok(self
            .instructions_for(revision_id)
            .await
            .into_iter()
            .filter(|row| row.resolved_at.is_none())
            .collect())
    }

    async fn resolve(
        &self,
        id: Uuid,
        comment: Option<&str>,
        resolved_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<RevisionInstruction>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.instructions.iter_mut().find(|row| row.id == id).map(|row| {
            row.resolved_at = Some(resolved_at);
            row.resolution_comment = comment.map(str::to_string);
            row.clone()
        }))
    }
}

#[async_trait]
impl ArticleStore for MemStore {
    async fn get_by_article_id(&self, article_id: &str) -> Result<Option<Article>, StoreError> {
        Ok(self.state.read().await.articles.get(article_id).cloned())
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn list_approvers(&self) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        let mut approvers: Vec<User> = state
            .users
            .values()
            .filter(|user| {
                user.is_active
                    && (matches!(user.role.as_str(), "approver" | "supervisor" | "admin")
                        || user.is_sv)
            })
            .cloned()
            .collect();
        approvers.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(approvers)
    }
}

#[async_trait]
impl NotificationStore for MemStore {
    async fn create(&self, new: &NewNotification) -> Result<Notification, StoreError> {
        let mut state = self.state.write().await;
        let row = Notification {
            id: Uuid::new_v4(),
            recipient_id: new.recipient_id,
            notification_type: new.notification_type.clone(),
            revision_id: new.revision_id,
            title: new.title.clone(),
            body: new.body.clone(),
            payload: new.payload.clone(),
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        state.notifications.push(row.clone());
        Ok(row)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && (!unread_only || !n.is_read))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        for notification in &mut state.notifications {
            if notification.id == id
                && notification.recipient_id == recipient_id
                && !notification.is_read
            {
                notification.is_read = true;
                notification.read_at = Some(Utc::now());
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let mut marked = 0;
        for notification in &mut state.notifications {
            if notification.recipient_id == recipient_id && !notification.is_read {
                notification.is_read = true;
                notification.read_at = Some(Utc::now());
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as i64)
    }
}

// ---------------------------------------------------------------------------
// Notifier doubles
// ---------------------------------------------------------------------------

/// Records every dispatched notification as `(type, recipient)`.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, UserId)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn sent_types(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(kind, _)| kind.clone()).collect()
    }

    async fn record(&self, kind: &str, recipient: UserId) -> Result<(), NotifyError> {
        self.sent.lock().await.push((kind.to_string(), recipient));
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_revision_created(
        &self,
        _revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError> {
        for approver in approvers {
            self.record("revision_created", approver.id).await?;
        }
        Ok(())
    }

    async fn notify_revision_submitted(
        &self,
        _revision: &Revision,
        approvers: &[User],
    ) -> Result<(), NotifyError> {
        for approver in approvers {
            self.record("revision_submitted", approver.id).await?;
        }
        Ok(())
    }

    async fn notify_revision_edited(
        &self,
        _revision: &Revision,
        _editor_id: UserId,
        recipient_id: UserId,
        _changes: &BTreeMap<String, FieldChange>,
    ) -> Result<(), NotifyError> {
        self.record("revision_edited", recipient_id).await
    }

    async fn notify_revision_approved(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        recipient_id: UserId,
    ) -> Result<(), NotifyError> {
        self.record("revision_approved", recipient_id).await
    }

    async fn notify_revision_rejected(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        recipient_id: UserId,
        _reason: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.record("revision_rejected", recipient_id).await
    }

    async fn notify_revision_modification_requested(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        recipient_id: UserId,
        _instruction_text: &str,
    ) -> Result<(), NotifyError> {
        self.record("revision_modification_requested", recipient_id).await
    }

    async fn notify_comment_added(
        &self,
        _revision: &Revision,
        _commenter_id: UserId,
        recipient_id: UserId,
        _comment: &str,
    ) -> Result<(), NotifyError> {
        self.record("comment_added", recipient_id).await
    }
}

/// Fails every dispatch, for asserting the swallow-and-continue policy.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify_revision_created(
        &self,
        _revision: &Revision,
        _approvers: &[User],
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_revision_submitted(
        &self,
        _revision: &Revision,
        _approvers: &[User],
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_revision_edited(
        &self,
        _revision: &Revision,
        _editor_id: UserId,
        _recipient_id: UserId,
        _changes: &BTreeMap<String, FieldChange>,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_revision_approved(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        _recipient_id: UserId,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_revision_rejected(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        _recipient_id: UserId,
        _reason: Option<&str>,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_revision_modification_requested(
        &self,
        _revision: &Revision,
        _approver_id: UserId,
        _recipient_id: UserId,
        _instruction_text: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }

    async fn notify_comment_added(
        &self,
        _revision: &Revision,
        _commenter_id: UserId,
        _recipient_id: UserId,
        _comment: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("wire unplugged".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn article(article_id: &str) -> Article {
    let now = Utc::now();
    Article {
        id: Uuid::new_v4(),
        article_id: article_id.to_string(),
        article_number: None,
        title: "Resetting a password".to_string(),
        info_category_code: Some("01".to_string()),
        keywords: Some("password,login".to_string()),
        importance: false,
        target: Some("internal".to_string()),
        question: Some("How do I reset my password?".to_string()),
        answer: Some("Use the self-service portal.".to_string()),
        additional_comment: None,
        publish_start: None,
        publish_end: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn user(username: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        full_name: None,
        role: role.as_str().to_string(),
        is_sv: false,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn actor_of(user: &User) -> Actor {
    user.actor().expect("fixture users carry valid roles")
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// All services wired against one `MemStore` and a recording notifier.
pub struct Harness {
    pub store: Arc<MemStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub workflow: Arc<WorkflowService>,
    pub approvals: ApprovalService,
    pub revisions: RevisionService,
    pub edits: EditHistoryService,
    pub instructions: InstructionService,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemStore::new();
        let notifier = RecordingNotifier::new();
        Self::with_parts(store, notifier)
    }

    fn with_parts(store: Arc<MemStore>, notifier: Arc<RecordingNotifier>) -> Self {
        let workflow = Arc::new(WorkflowService::new(store.clone()));
        let approvals = ApprovalService::new(store.clone(), store.clone(), notifier.clone());
        let revisions = RevisionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            workflow.clone(),
            notifier.clone(),
        );
        let edits = EditHistoryService::new(store.clone());
        let instructions = InstructionService::new(store.clone());
        Self { store, notifier, workflow, approvals, revisions, edits, instructions }
    }

    /// Harness whose notifier always fails, for swallow-policy tests.
    pub fn with_failing_notifier() -> Self {
        let store = MemStore::new();
        let notifier: Arc<dyn Notifier> = Arc::new(FailingNotifier);
        let workflow = Arc::new(WorkflowService::new(store.clone()));
        let approvals = ApprovalService::new(store.clone(), store.clone(), notifier.clone());
        let revisions = RevisionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            workflow.clone(),
            notifier,
        );
        let edits = EditHistoryService::new(store.clone());
        let instructions = InstructionService::new(store.clone());
        Self {
            store,
            notifier: RecordingNotifier::new(),
            workflow,
            approvals,
            revisions,
            edits,
            instructions,
        }
    }

    /// Seed the standard cast: an article, a proposer, and an approver.
    pub async fn seed_basic(&self) -> (Actor, Actor) {
        self.store.seed_article(article("KB-0001")).await;
        let proposer = user("tanaka", Role::General);
        let approver = user("sato", Role::Approver);
        let proposer_actor = actor_of(&proposer);
        let approver_actor = actor_of(&approver);
        self.store.seed_user(proposer).await;
        self.store.seed_user(approver).await;
        (proposer_actor, approver_actor)
    }

    /// Create a draft revision proposing a new title and answer.
    pub async fn draft_revision(&self, proposer: &Actor) -> Revision {
        use ringi_db::models::revision::{CreateRevision, RevisionModifications};
        self.revisions
            .create_revision(
                CreateRevision {
                    target_article_id: "KB-0001".to_string(),
                    reason: "The answer no longer matches the portal flow".to_string(),
                    modifications: RevisionModifications {
                        title: Some("Resetting a forgotten password".to_string()),
                        answer: Some("Use the new self-service portal.".to_string()),
                        ..RevisionModifications::default()
                    },
                },
                proposer,
            )
            .await
            .expect("draft creation should succeed")
    }
}
