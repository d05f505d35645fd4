//! Persistence gateway for resume documents.
//!
//! The coordinator only ever talks to `dyn ResumeStore`; `AppState` carries the
//! Postgres implementation, tests use the in-memory one.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::ResumeDocument;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("malformed resume record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("resume {0} not found")]
    NotFound(Uuid),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            e => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Returns the user's resume, or `None` when they have never saved one.
    async fn load_by_user(&self, user_id: Uuid) -> Result<Option<ResumeDocument>, StoreError>;

    /// Inserts a new record and returns its identifier.
    async fn create(&self, user_id: Uuid, document: &ResumeDocument) -> Result<Uuid, StoreError>;

    /// Overwrites the record addressed by `id`.
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        document: &ResumeDocument,
    ) -> Result<(), StoreError>;
}
