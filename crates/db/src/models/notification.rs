//! Persisted workflow notifications.

use ringi_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub notification_type: String,
    pub revision_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert payload for a new notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub notification_type: String,
    pub revision_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}
