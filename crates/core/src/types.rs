/// Users, revisions, instructions, and history rows are keyed by UUID.
pub type UserId = uuid::Uuid;

/// Revision primary key.
pub type RevisionId = uuid::Uuid;

/// Articles are referenced by their external string key, not a UUID.
pub type ArticleId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
