//! Knowledge-base article model (read-only input to revisions).

use ringi_core::fields::FieldValues;
use ringi_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `articles` table.
///
/// Articles are owned by the surrounding knowledge-base system; this
/// workspace only reads them to snapshot revision `before_*` values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: Uuid,
    /// External string key other systems use to reference the article.
    pub article_id: String,
    pub article_number: Option<String>,
    pub title: String,
    pub info_category_code: Option<String>,
    /// Comma-separated keywords.
    pub keywords: Option<String>,
    pub importance: bool,
    pub target: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub additional_comment: Option<String>,
    pub publish_start: Option<Timestamp>,
    pub publish_end: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Article {
    /// Keywords split into a list, empty entries dropped.
    pub fn keywords_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether the article is live at `now` given its publish window.
    pub fn is_published(&self, now: Timestamp) -> bool {
        if !self.is_active {
            return false;
        }
        if self.publish_start.is_some_and(|start| now < start) {
            return false;
        }
        if self.publish_end.is_some_and(|end| now > end) {
            return false;
        }
        true
    }

    /// Snapshot the editable attributes for a revision's `before_*` columns.
    pub fn field_values(&self) -> FieldValues {
        FieldValues {
            title: Some(self.title.clone()),
            info_category: self.info_category_code.clone(),
            keywords: self.keywords.clone(),
            importance: Some(self.importance),
            target: self.target.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            additional_comment: self.additional_comment.clone(),
            publish_start: self.publish_start,
            publish_end: self.publish_end,
        }
    }
}
