//! Persistence layer for the ringi revision-approval workflow.
//!
//! - [`models`] — row structs and insert DTOs, one module per aggregate.
//! - [`store`] — the async store contracts consumed by the orchestration
//!   services, plus their Postgres implementations.

pub mod models;
pub mod store;

use sqlx::postgres::PgPoolOptions;

/// All queries run against a shared Postgres pool.
pub type DbPool = sqlx::PgPool;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Pool size (`DB_MAX_CONNECTIONS`, default `5`).
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `DATABASE_URL`       | —       |
    /// | `DB_MAX_CONNECTIONS` | `5`     |
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let database_url = std::env::var("DATABASE_URL")?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        Ok(Self { database_url, max_connections })
    }
}

/// Connect a pool using the given configuration.
pub async fn connect(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(max_connections = config.max_connections, "connecting to database");
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}
