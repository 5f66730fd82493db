//! Revision entity and DTOs.

use ringi_core::error::CoreError;
use ringi_core::fields::FieldValues;
use ringi_core::permissions::RevisionMeta;
use ringi_core::status::RevisionStatus;
use ringi_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `revisions` table.
///
/// Each editable article attribute is stored as a `before_*`/`after_*`
/// column pair: `before_*` is the snapshot taken from the article at
/// creation time, `after_*` the proposed value (`NULL` = no change).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: Uuid,
    pub target_article_id: String,
    pub proposer_id: Uuid,
    pub status: String,
    pub reason: String,

    pub before_title: Option<String>,
    pub after_title: Option<String>,
    pub before_info_category: Option<String>,
    pub after_info_category: Option<String>,
    pub before_keywords: Option<String>,
    pub after_keywords: Option<String>,
    pub before_importance: Option<bool>,
    pub after_importance: Option<bool>,
    pub before_target: Option<String>,
    pub after_target: Option<String>,
    pub before_question: Option<String>,
    pub after_question: Option<String>,
    pub before_answer: Option<String>,
    pub after_answer: Option<String>,
    pub before_additional_comment: Option<String>,
    pub after_additional_comment: Option<String>,
    pub before_publish_start: Option<Timestamp>,
    pub after_publish_start: Option<Timestamp>,
    pub before_publish_end: Option<Timestamp>,
    pub after_publish_end: Option<Timestamp>,

    /// Optimistic-concurrency marker, starts at 1, bumped on content edits.
    pub version: i32,
    pub approver_id: Option<Uuid>,
    pub approved_at: Option<Timestamp>,
    pub approval_comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Revision {
    /// Parse the stored status string into the lifecycle enum.
    pub fn status(&self) -> Result<RevisionStatus, CoreError> {
        RevisionStatus::parse(&self.status)
            .ok_or_else(|| CoreError::Internal(format!("unknown revision status '{}'", self.status)))
    }

    /// The slice of this row the permission matrix needs.
    pub fn meta(&self) -> Result<RevisionMeta, CoreError> {
        Ok(RevisionMeta::new(self.proposer_id, self.status()?))
    }

    /// The article snapshot taken at creation time.
    pub fn before_values(&self) -> FieldValues {
        FieldValues {
            title: self.before_title.clone(),
            info_category: self.before_info_category.clone(),
            keywords: self.before_keywords.clone(),
            importance: self.before_importance,
            target: self.before_target.clone(),
            question: self.before_question.clone(),
            answer: self.before_answer.clone(),
            additional_comment: self.before_additional_comment.clone(),
            publish_start: self.before_publish_start,
            publish_end: self.before_publish_end,
        }
    }

    /// The currently proposed values (`None` = field unchanged).
    pub fn after_values(&self) -> FieldValues {
        FieldValues {
            title: self.after_title.clone(),
            info_category: self.after_info_category.clone(),
            keywords: self.after_keywords.clone(),
            importance: self.after_importance,
            target: self.after_target.clone(),
            question: self.after_question.clone(),
            answer: self.after_answer.clone(),
            additional_comment: self.after_additional_comment.clone(),
            publish_start: self.after_publish_start,
            publish_end: self.after_publish_end,
        }
    }

    /// Field names with an actual proposed change.
    pub fn modified_fields(&self) -> Vec<String> {
        ringi_core::fields::calculate_revision_diff(&self.before_values(), &self.after_values())
            .modified_fields
    }
}

/// Proposed new values for the editable fields. `None` = leave unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionModifications {
    pub title: Option<String>,
    pub info_category: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub importance: Option<bool>,
    pub target: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub additional_comment: Option<String>,
    pub publish_start: Option<Timestamp>,
    pub publish_end: Option<Timestamp>,
}

impl RevisionModifications {
    /// Fold these modifications into an existing `after_*` snapshot.
    ///
    /// Keywords are joined back into the comma-separated storage form.
    pub fn apply_to(&self, mut after: FieldValues) -> FieldValues {
        if let Some(title) = &self.title {
            after.title = Some(title.clone());
        }
        if let Some(category) = &self.info_category {
            after.info_category = Some(category.clone());
        }
        if let Some(keywords) = &self.keywords {
            after.keywords = Some(keywords.join(","));
        }
        if let Some(importance) = self.importance {
            after.importance = Some(importance);
        }
        if let Some(target) = &self.target {
            after.target = Some(target.clone());
        }
        if let Some(question) = &self.question {
            after.question = Some(question.clone());
        }
        if let Some(answer) = &self.answer {
            after.answer = Some(answer.clone());
        }
        if let Some(comment) = &self.additional_comment {
            after.additional_comment = Some(comment.clone());
        }
        if let Some(start) = self.publish_start {
            after.publish_start = Some(start);
        }
        if let Some(end) = self.publish_end {
            after.publish_end = Some(end);
        }
        after
    }
}

/// DTO for creating a new revision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRevision {
    pub target_article_id: String,
    pub reason: String,
    #[serde(default)]
    pub modifications: RevisionModifications,
}

/// DTO for editing a revision's content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRevision {
    pub reason: Option<String>,
    #[serde(default)]
    pub modifications: RevisionModifications,
    /// Optional note stored with the edit-history record.
    pub comment: Option<String>,
}

/// Fully resolved insert payload (snapshot already taken).
#[derive(Debug, Clone)]
pub struct NewRevision {
    pub target_article_id: String,
    pub proposer_id: Uuid,
    pub reason: String,
    pub before: FieldValues,
    pub after: FieldValues,
}

/// Approval metadata written at the terminal approve/reject transition.
#[derive(Debug, Clone)]
pub struct ApprovalStamp {
    pub approver_id: Uuid,
    pub approved_at: Timestamp,
    pub comment: Option<String>,
}

/// Listing filter; unset fields do not constrain the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionFilter {
    pub status: Option<RevisionStatus>,
    pub proposer_id: Option<Uuid>,
    pub target_article_id: Option<String>,
    pub created_after: Option<Timestamp>,
    pub created_before: Option<Timestamp>,
}

/// Dashboard counts of revisions in review-related statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub under_review: i64,
    pub revision_requested: i64,
    pub approved: i64,
    pub rejected: i64,
}
