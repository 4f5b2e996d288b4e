use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Section, User};

/// Errors from a UserStore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(_)
            | sqlx::Error::RowNotFound
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => StoreError::Query(err.to_string()),
            other => StoreError::Sqlx(other),
        }
    }
}

/// Persistence boundary for user documents.
///
/// Implementations must enforce username uniqueness themselves at write time;
/// callers never pre-check before `create`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a new user; fails with `DuplicateUsername` on collision
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    /// Overwrite the user's whole sections list in one write
    async fn replace_sections(&self, id: Uuid, sections: &[Section]) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
