//! Repository Module
//!
//! Free async functions over the SQLite pool, one module per table.
//! Multi-row writes (order creation, payments, shift transitions) run
//! inside transactions so partial state never becomes visible.

pub mod category;
pub mod order;
pub mod product;
pub mod profile;
pub mod shift;
pub mod stock;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A required state precondition does not hold (e.g. no active
    /// shift when processing a payment)
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool for repository tests.
    ///
    /// A single connection is required: every `sqlite::memory:`
    /// connection gets its own private database.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }
}
