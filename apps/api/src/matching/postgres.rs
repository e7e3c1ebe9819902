//! sqlx-backed Like/Match stores.
//!
//! The unique indexes on `likes (sender_user_id, receiver_user_id)` and
//! `matches (company_user_id, jobseeker_user_id)` are the source of truth for
//! idempotency. Nothing here does check-then-insert.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::matching::store::{LikeInsert, LikeStore, MatchStore, StoreError};
use crate::models::like::{LikeRow, NewLike};
use crate::models::matching::{MatchPair, MatchRow, MatchedBy};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for PgStore {
    async fn insert_like(&self, like: NewLike) -> Result<LikeInsert, StoreError> {
        let inserted = sqlx::query_as::<_, LikeRow>(
            r#"
            INSERT INTO likes (id, sender_user_id, receiver_user_id, sender_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (sender_user_id, receiver_user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(like.sender_user_id)
        .bind(like.receiver_user_id)
        .bind(like.sender_type)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            info!(
                "Recorded like {} from {} ({}) to {}",
                row.id, row.sender_user_id, row.sender_type, row.receiver_user_id
            );
            return Ok(LikeInsert::Created(row));
        }

        let existing = self
            .find_like(like.sender_user_id, like.receiver_user_id)
            .await?
            .ok_or_else(|| {
                StoreError::Unavailable(format!(
                    "like {} -> {} conflicted but could not be read back",
                    like.sender_user_id, like.receiver_user_id
                ))
            })?;
        Ok(LikeInsert::AlreadyRecorded(existing))
    }

    async fn find_like(&self, sender: Uuid, receiver: Uuid) -> Result<Option<LikeRow>, StoreError> {
        Ok(sqlx::query_as::<_, LikeRow>(
            "SELECT * FROM likes WHERE sender_user_id = $1 AND receiver_user_id = $2",
        )
        .bind(sender)
        .bind(receiver)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_received(&self, receiver: Uuid) -> Result<Vec<LikeRow>, StoreError> {
        Ok(sqlx::query_as::<_, LikeRow>(
            "SELECT * FROM likes WHERE receiver_user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(receiver)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl MatchStore for PgStore {
    async fn find_match(&self, pair: MatchPair) -> Result<Option<MatchRow>, StoreError> {
        Ok(sqlx::query_as::<_, MatchRow>(
            "SELECT * FROM matches WHERE company_user_id = $1 AND jobseeker_user_id = $2",
        )
        .bind(pair.company_user_id)
        .bind(pair.jobseeker_user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_match(
        &self,
        pair: MatchPair,
        matched_by: MatchedBy,
    ) -> Result<MatchRow, StoreError> {
        // A concurrent winner surfaces as SQLSTATE 23505 -> StoreError::Conflict.
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (id, company_user_id, jobseeker_user_id, matched_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pair.company_user_id)
        .bind(pair.jobseeker_user_id)
        .bind(matched_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRow>, StoreError> {
        Ok(sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM matches
            WHERE company_user_id = $1 OR jobseeker_user_id = $1
            ORDER BY matched_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
