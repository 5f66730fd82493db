//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//!
//! Enum-valued columns (status, role, action, priority) are stored as
//! their canonical snake_case strings; typed accessors parse them back
//! into the `ringi-core` enums so all domain logic stays enum-keyed.

pub mod approval;
pub mod article;
pub mod edit_history;
pub mod instruction;
pub mod notification;
pub mod revision;
pub mod user;
