//! Postgres implementation of [`InstructionStore`].

use async_trait::async_trait;
use ringi_core::types::Timestamp;
use uuid::Uuid;

use crate::models::instruction::{NewInstruction, RevisionInstruction};
use crate::store::{InstructionStore, StoreError};
use crate::DbPool;

/// Column list for `revision_instructions` queries.
const COLUMNS: &str = "id, revision_id, instructor_id, instruction_text, required_fields, \
    priority, due_date, resolved_at, resolution_comment, created_at";

pub struct PgInstructionStore {
    pool: DbPool,
}

impl PgInstructionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstructionStore for PgInstructionStore {
    async fn get(&self, id: Uuid) -> Result<Option<RevisionInstruction>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM revision_instructions WHERE id = $1");
        Ok(sqlx::query_as::<_, RevisionInstruction>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, new: &NewInstruction) -> Result<RevisionInstruction, StoreError> {
        let query = format!(
            "INSERT INTO revision_instructions
                (id, revision_id, instructor_id, instruction_text, required_fields, priority, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, RevisionInstruction>(&query)
            .bind(Uuid::new_v4())
            .bind(new.revision_id)
            .bind(new.instructor_id)
            .bind(&new.instruction_text)
            .bind(new.required_fields_json())
            .bind(new.priority.as_str())
            .bind(new.due_date)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM revision_instructions
             WHERE revision_id = $1
             ORDER BY created_at ASC"
        );
        Ok(sqlx::query_as::<_, RevisionInstruction>(&query)
            .bind(revision_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_unresolved(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionInstruction>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM revision_instructions
             WHERE revision_id = $1 AND resolved_at IS NULL
             ORDER BY created_at ASC"
        );
        Ok(sqlx::query_as::<_, RevisionInstruction>(&query)
            .bind(revision_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn resolve(
        &self,
        id: Uuid,
        comment: Option<&str>,
        resolved_at: Timestamp,
    ) -> Result<Option<RevisionInstruction>, StoreError> {
        let query = format!(
            "UPDATE revision_instructions SET
                resolved_at = $2,
                resolution_comment = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, RevisionInstruction>(&query)
            .bind(id)
            .bind(resolved_at)
            .bind(comment)
            .fetch_optional(&self.pool)
            .await?)
    }
}
