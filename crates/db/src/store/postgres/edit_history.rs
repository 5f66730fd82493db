//! Postgres implementation of [`EditHistoryStore`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::edit_history::{NewEditRecord, RevisionEditHistory};
use crate::store::{EditHistoryStore, StoreError};
use crate::DbPool;

/// Column list for `revision_edit_histories` queries.
const COLUMNS: &str = "id, revision_id, editor_id, editor_role, changes, comment, \
    version_before, version_after, edited_at";

pub struct PgEditHistoryStore {
    pool: DbPool,
}

impl PgEditHistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EditHistoryStore for PgEditHistoryStore {
    async fn append(&self, edit: &NewEditRecord) -> Result<RevisionEditHistory, StoreError> {
        let query = format!(
            "INSERT INTO revision_edit_histories
                (id, revision_id, editor_id, editor_role, changes, comment, version_before, version_after)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, RevisionEditHistory>(&query)
            .bind(Uuid::new_v4())
            .bind(edit.revision_id)
            .bind(edit.editor_id)
            .bind(edit.editor_role.as_str())
            .bind(edit.changes_json())
            .bind(&edit.comment)
            .bind(edit.version_before)
            .bind(edit.version_after)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<RevisionEditHistory>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM revision_edit_histories
             WHERE revision_id = $1
             ORDER BY edited_at ASC"
        );
        Ok(sqlx::query_as::<_, RevisionEditHistory>(&query)
            .bind(revision_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
