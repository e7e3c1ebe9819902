//! Like Store and Match Store contracts.
//!
//! Uniqueness lives in the store, not in the engine: a like insert is an
//! insert-if-absent, and a match insert that collides with an existing pair
//! fails with [`StoreError::Conflict`] so the caller can recover the winner's row.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::like::{LikeRow, NewLike};
use crate::models::matching::{MatchPair, MatchRow, MatchedBy};

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if db.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                StoreError::Conflict
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Result of an insert-if-absent on the like table.
#[derive(Debug, Clone)]
pub enum LikeInsert {
    Created(LikeRow),
    /// The sender had already liked the receiver; this is the first recorded row.
    AlreadyRecorded(LikeRow),
}

impl LikeInsert {
    pub fn row(&self) -> &LikeRow {
        match self {
            LikeInsert::Created(row) | LikeInsert::AlreadyRecorded(row) => row,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, LikeInsert::Created(_))
    }
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Atomically records the like unless one already exists for the ordered pair.
    async fn insert_like(&self, like: NewLike) -> Result<LikeInsert, StoreError>;

    async fn find_like(&self, sender: Uuid, receiver: Uuid) -> Result<Option<LikeRow>, StoreError>;

    /// Likes addressed to `receiver`, newest first.
    async fn list_received(&self, receiver: Uuid) -> Result<Vec<LikeRow>, StoreError>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn find_match(&self, pair: MatchPair) -> Result<Option<MatchRow>, StoreError>;

    /// Writes a new match. Fails with [`StoreError::Conflict`] if the pair is already matched.
    async fn insert_match(
        &self,
        pair: MatchPair,
        matched_by: MatchedBy,
    ) -> Result<MatchRow, StoreError>;

    /// Matches where `user_id` is either side, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRow>, StoreError>;
}
