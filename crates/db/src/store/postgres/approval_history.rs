//! Postgres implementation of [`ApprovalHistoryStore`].
//!
//! Writes happen inside the compound revision operations; this store only
//! reads the trail back.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::approval::ApprovalHistory;
use crate::store::{ApprovalHistoryStore, StoreError};
use crate::DbPool;

/// Column list for `approval_histories` queries.
const COLUMNS: &str = "id, revision_id, actor_id, action, comment, created_at";

pub struct PgApprovalHistoryStore {
    pool: DbPool,
}

impl PgApprovalHistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalHistoryStore for PgApprovalHistoryStore {
    async fn list_for_revision(
        &self,
        revision_id: Uuid,
    ) -> Result<Vec<ApprovalHistory>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM approval_histories
             WHERE revision_id = $1
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, ApprovalHistory>(&query)
            .bind(revision_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
