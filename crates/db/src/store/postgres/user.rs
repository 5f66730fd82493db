//! Postgres implementation of [`UserStore`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::User;
use crate::store::{StoreError, UserStore};
use crate::DbPool;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, full_name, role, is_sv, is_active, created_at, updated_at";

pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_approvers(&self) -> Result<Vec<User>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE is_active = true
               AND (role IN ('approver', 'supervisor', 'admin') OR is_sv = true)
             ORDER BY username ASC"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?)
    }
}
