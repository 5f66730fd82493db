//! Postgres implementation of [`RevisionStore`].

use async_trait::async_trait;
use ringi_core::fields::FieldValues;
use ringi_core::status::RevisionStatus;
use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use crate::models::approval::NewApprovalRecord;
use crate::models::edit_history::NewEditRecord;
use crate::models::instruction::NewInstruction;
use crate::models::revision::{
    ApprovalStamp, NewRevision, Revision, RevisionFilter, StatusCounts,
};
use crate::store::{RevisionStore, StoreError};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, target_article_id, proposer_id, status, reason, \
    before_title, after_title, before_info_category, after_info_category, \
    before_keywords, after_keywords, before_importance, after_importance, \
    before_target, after_target, before_question, after_question, \
    before_answer, after_answer, before_additional_comment, after_additional_comment, \
    before_publish_start, after_publish_start, before_publish_end, after_publish_end, \
    version, approver_id, approved_at, approval_comment, created_at, updated_at";

/// Statuses that count toward the one-active-revision-per-article limit.
const ACTIVE_STATUSES: &str = "'draft', 'under_review', 'revision_requested'";

/// Partial unique index backing the single-active invariant.
const ACTIVE_UNIQUE_INDEX: &str = "uq_revisions_one_active";

pub struct PgRevisionStore {
    pool: DbPool,
}

impl PgRevisionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply a status mutation on an open connection, returning the row.
    async fn update_status_on(
        conn: &mut PgConnection,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
    ) -> Result<Revision, StoreError> {
        let query = format!(
            "UPDATE revisions SET
                status = $2,
                approver_id = COALESCE($3, approver_id),
                approved_at = COALESCE($4, approved_at),
                approval_comment = COALESCE($5, approval_comment),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(id)
            .bind(to.as_str())
            .bind(stamp.map(|s| s.approver_id))
            .bind(stamp.map(|s| s.approved_at))
            .bind(stamp.and_then(|s| s.comment.clone()))
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::RowNotFound)
    }

    /// Insert an approval-history record on an open connection.
    async fn insert_history_on(
        conn: &mut PgConnection,
        audit: &NewApprovalRecord,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO approval_histories (id, revision_id, actor_id, action, comment)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(audit.revision_id)
        .bind(audit.actor_id)
        .bind(audit.action.as_str())
        .bind(&audit.comment)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RevisionStore for PgRevisionStore {
    async fn get(&self, id: Uuid) -> Result<Option<Revision>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM revisions WHERE id = $1");
        Ok(sqlx::query_as::<_, Revision>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, new: NewRevision) -> Result<Revision, StoreError> {
        // The WHERE NOT EXISTS guard and the partial unique index together
        // make the single-active check race-free.
        let query = format!(
            "INSERT INTO revisions (
                id, target_article_id, proposer_id, status, reason,
                before_title, after_title, before_info_category, after_info_category,
                before_keywords, after_keywords, before_importance, after_importance,
                before_target, after_target, before_question, after_question,
                before_answer, after_answer, before_additional_comment, after_additional_comment,
                before_publish_start, after_publish_start, before_publish_end, after_publish_end)
             SELECT $1, $2, $3, 'draft', $4,
                $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
             WHERE NOT EXISTS (
                SELECT 1 FROM revisions
                WHERE target_article_id = $2 AND status IN ({ACTIVE_STATUSES}))
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Revision>(&query)
            .bind(Uuid::new_v4())
            .bind(&new.target_article_id)
            .bind(new.proposer_id)
            .bind(&new.reason)
            .bind(&new.before.title)
            .bind(&new.after.title)
            .bind(&new.before.info_category)
            .bind(&new.after.info_category)
            .bind(&new.before.keywords)
            .bind(&new.after.keywords)
            .bind(new.before.importance)
            .bind(new.after.importance)
            .bind(&new.before.target)
            .bind(&new.after.target)
            .bind(&new.before.question)
            .bind(&new.after.question)
            .bind(&new.before.answer)
            .bind(&new.after.answer)
            .bind(&new.before.additional_comment)
            .bind(&new.after.additional_comment)
            .bind(new.before.publish_start)
            .bind(new.after.publish_start)
            .bind(new.before.publish_end)
            .bind(new.after.publish_end)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db)
                    if db.constraint() == Some(ACTIVE_UNIQUE_INDEX) =>
                {
                    StoreError::ActiveRevisionExists(new.target_article_id.clone())
                }
                _ => StoreError::Database(e),
            })?;

        inserted.ok_or_else(|| StoreError::ActiveRevisionExists(new.target_article_id))
    }

    async fn list(
        &self,
        filter: &RevisionFilter,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Revision>, StoreError> {
        let mut builder: QueryBuilder<'_, sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM revisions WHERE true"));
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(proposer_id) = filter.proposer_id {
            builder.push(" AND proposer_id = ").push_bind(proposer_id);
        }
        if let Some(article_id) = &filter.target_article_id {
            builder
                .push(" AND target_article_id = ")
                .push_bind(article_id.clone());
        }
        if let Some(created_after) = filter.created_after {
            builder.push(" AND created_at >= ").push_bind(created_after);
        }
        if let Some(created_before) = filter.created_before {
            builder.push(" AND created_at <= ").push_bind(created_before);
        }
        builder
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(skip)
            .push(" LIMIT ")
            .push_bind(limit);

        Ok(builder
            .build_query_as::<Revision>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM revisions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_active(
        &self,
        article_id: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let query = format!(
            "SELECT EXISTS(
                SELECT 1 FROM revisions
                WHERE target_article_id = $1
                  AND status IN ({ACTIVE_STATUSES})
                  AND ($2::uuid IS NULL OR id <> $2))"
        );
        let exists: bool = sqlx::query_scalar(&query)
            .bind(article_id)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn update_status(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
    ) -> Result<Revision, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Self::update_status_on(&mut conn, id, to, stamp).await
    }

    async fn apply_transition(
        &self,
        id: Uuid,
        to: RevisionStatus,
        stamp: Option<&ApprovalStamp>,
        audit: &NewApprovalRecord,
    ) -> Result<Revision, StoreError> {
        let mut tx = self.pool.begin().await?;
        let revision = Self::update_status_on(&mut tx, id, to, stamp).await?;
        Self::insert_history_on(&mut tx, audit).await?;
        tx.commit().await?;
        Ok(revision)
    }

    async fn apply_modification_request(
        &self,
        id: Uuid,
        audit: &NewApprovalRecord,
        instruction: &NewInstruction,
    ) -> Result<Revision, StoreError> {
        let mut tx = self.pool.begin().await?;
        let revision =
            Self::update_status_on(&mut tx, id, RevisionStatus::RevisionRequested, None).await?;
        Self::insert_history_on(&mut tx, audit).await?;
        sqlx::query(
            "INSERT INTO revision_instructions
                (id, revision_id, instructor_id, instruction_text, required_fields, priority, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(Uuid::new_v4())
        .bind(instruction.revision_id)
        .bind(instruction.instructor_id)
        .bind(&instruction.instruction_text)
        .bind(instruction.required_fields_json())
        .bind(instruction.priority.as_str())
        .bind(instruction.due_date)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(revision)
    }

    async fn apply_content_edit(
        &self,
        id: Uuid,
        expected_version: i32,
        reason: &str,
        after: &FieldValues,
        edit: &NewEditRecord,
    ) -> Result<Revision, StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE revisions SET
                reason = $3,
                after_title = $4,
                after_info_category = $5,
                after_keywords = $6,
                after_importance = $7,
                after_target = $8,
                after_question = $9,
                after_answer = $10,
                after_additional_comment = $11,
                after_publish_start = $12,
                after_publish_end = $13,
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Revision>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(reason)
            .bind(&after.title)
            .bind(&after.info_category)
            .bind(&after.keywords)
            .bind(after.importance)
            .bind(&after.target)
            .bind(&after.question)
            .bind(&after.answer)
            .bind(&after.additional_comment)
            .bind(after.publish_start)
            .bind(after.publish_end)
            .fetch_optional(&mut *tx)
            .await?;

        let revision = match updated {
            Some(revision) => revision,
            None => {
                // Distinguish a vanished row from a stale version marker.
                let found: Option<i32> =
                    sqlx::query_scalar("SELECT version FROM revisions WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match found {
                    Some(found) => StoreError::StaleVersion { expected: expected_version, found },
                    None => StoreError::RowNotFound,
                });
            }
        };

        sqlx::query(
            "INSERT INTO revision_edit_histories
                (id, revision_id, editor_id, editor_role, changes, comment, version_before, version_after)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::new_v4())
        .bind(edit.revision_id)
        .bind(edit.editor_id)
        .bind(edit.editor_role.as_str())
        .bind(edit.changes_json())
        .bind(&edit.comment)
        .bind(edit.version_before)
        .bind(edit.version_after)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(revision)
    }

    async fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM revisions
             WHERE status IN ('under_review', 'revision_requested', 'approved', 'rejected')
             GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status.as_str() {
                "under_review" => counts.under_review = count,
                "revision_requested" => counts.revision_requested = count,
                "approved" => counts.approved = count,
                "rejected" => counts.rejected = count,
                _ => {}
            }
        }
        Ok(counts)
    }
}
