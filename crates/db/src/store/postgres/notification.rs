//! Postgres implementation of [`NotificationStore`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::notification::{NewNotification, Notification};
use crate::store::{NotificationStore, StoreError};
use crate::DbPool;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, recipient_id, notification_type, revision_id, title, body, payload, \
    is_read, read_at, created_at";

pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, new: &NewNotification) -> Result<Notification, StoreError> {
        let query = format!(
            "INSERT INTO notifications
                (id, recipient_id, notification_type, revision_id, title, body, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(Uuid::new_v4())
            .bind(new.recipient_id)
            .bind(&new.notification_type)
            .bind(new.revision_id)
            .bind(&new.title)
            .bind(&new.body)
            .bind(&new.payload)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let filter = if unread_only { "AND is_read = false" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE recipient_id = $1 {filter}
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = true, read_at = NOW()
             WHERE id = $1 AND recipient_id = $2 AND is_read = false",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = true, read_at = NOW()
             WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64, StoreError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
