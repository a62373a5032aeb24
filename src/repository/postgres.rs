//! PostgreSQL store shared by the per-entity repositories

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::MaintenanceStore;
use crate::error::{AppError, AppResult};

/// SQLSTATE for unique_violation
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for foreign_key_violation
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// True when `err` is a database error carrying SQLSTATE `code`
pub fn is_violation(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(code),
        _ => false,
    }
}

/// Map a failed `UPDATE ... RETURNING` / `DELETE` that touched no row
pub fn not_found(kind: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

#[async_trait]
impl MaintenanceStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn clear_catalog(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            TRUNCATE book_instances, book_genres, books, authors, genres, languages
            RESTART IDENTITY
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
