//! Postgres-backed store implementations.
//!
//! Each store holds a cloned [`DbPool`](crate::DbPool) and implements its
//! contract with plain `sqlx` queries. Compound workflow mutations use a
//! transaction so the status change, audit record, and companion rows
//! commit or roll back together.

mod approval_history;
mod article;
mod edit_history;
mod instruction;
mod notification;
mod revision;
mod user;

pub use approval_history::PgApprovalHistoryStore;
pub use article::PgArticleStore;
pub use edit_history::PgEditHistoryStore;
pub use instruction::PgInstructionStore;
pub use notification::PgNotificationStore;
pub use revision::PgRevisionStore;
pub use user::PgUserStore;
