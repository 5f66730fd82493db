//! Postgres implementation of [`ArticleStore`] (read-only).

use async_trait::async_trait;

use crate::models::article::Article;
use crate::store::{ArticleStore, StoreError};
use crate::DbPool;

/// Column list for `articles` queries.
const COLUMNS: &str = "id, article_id, article_number, title, info_category_code, keywords, \
    importance, target, question, answer, additional_comment, publish_start, publish_end, \
    is_active, created_at, updated_at";

pub struct PgArticleStore {
    pool: DbPool,
}

impl PgArticleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn get_by_article_id(&self, article_id: &str) -> Result<Option<Article>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE article_id = $1");
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
