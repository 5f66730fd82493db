//! User accounts, as resolved by the external auth layer.

use ringi_core::error::CoreError;
use ringi_core::role::{Actor, Role};
use ringi_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table.
///
/// Authentication (passwords, tokens, sessions) lives outside this
/// workspace; rows here only supply identity, role, and the supervisor
/// flag.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_sv: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parse the stored role string.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::parse(&self.role)
            .ok_or_else(|| CoreError::Internal(format!("unknown role '{}'", self.role)))
    }

    /// Project into the principal shape the permission matrix consumes.
    pub fn actor(&self) -> Result<Actor, CoreError> {
        Ok(Actor { id: self.id, role: self.role()?, is_sv: self.is_sv })
    }
}
