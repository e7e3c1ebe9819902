//! In-memory Like/Match stores for tests.
//!
//! Each insert holds the table lock across the existence check and the write,
//! which gives the same insert-if-absent semantics as the Postgres unique indexes.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::matching::store::{LikeInsert, LikeStore, MatchStore, StoreError};
use crate::models::like::{LikeRow, NewLike};
use crate::models::matching::{MatchPair, MatchRow, MatchedBy};

#[derive(Default)]
pub struct MemoryStore {
    // Vecs keep insertion order so equal timestamps still sort newest first.
    likes: Mutex<Vec<LikeRow>>,
    matches: Mutex<Vec<MatchRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn like_count(&self) -> usize {
        self.likes.lock().await.len()
    }

    pub async fn match_count(&self) -> usize {
        self.matches.lock().await.len()
    }
}

/// Newest first; later inserts win ties.
fn newest_first<T: Clone>(rows: &[T], key: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn insert_like(&self, like: NewLike) -> Result<LikeInsert, StoreError> {
        let mut likes = self.likes.lock().await;
        if let Some(existing) = likes.iter().find(|l| {
            l.sender_user_id == like.sender_user_id && l.receiver_user_id == like.receiver_user_id
        }) {
            return Ok(LikeInsert::AlreadyRecorded(existing.clone()));
        }
        let row = LikeRow {
            id: Uuid::new_v4(),
            sender_user_id: like.sender_user_id,
            receiver_user_id: like.receiver_user_id,
            sender_type: like.sender_type,
            created_at: Utc::now(),
        };
        likes.push(row.clone());
        Ok(LikeInsert::Created(row))
    }

    async fn find_like(&self, sender: Uuid, receiver: Uuid) -> Result<Option<LikeRow>, StoreError> {
        Ok(self
            .likes
            .lock()
            .await
            .iter()
            .find(|l| l.sender_user_id == sender && l.receiver_user_id == receiver)
            .cloned())
    }

    async fn list_received(&self, receiver: Uuid) -> Result<Vec<LikeRow>, StoreError> {
        let likes = self.likes.lock().await;
        let received: Vec<LikeRow> = likes
            .iter()
            .filter(|l| l.receiver_user_id == receiver)
            .cloned()
            .collect();
        Ok(newest_first(&received, |l| l.created_at))
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn find_match(&self, pair: MatchPair) -> Result<Option<MatchRow>, StoreError> {
        Ok(self
            .matches
            .lock()
            .await
            .iter()
            .find(|m| m.pair() == pair)
            .cloned())
    }

    async fn insert_match(
        &self,
        pair: MatchPair,
        matched_by: MatchedBy,
    ) -> Result<MatchRow, StoreError> {
        let mut matches = self.matches.lock().await;
        if matches.iter().any(|m| m.pair() == pair) {
            return Err(StoreError::Conflict);
        }
        let row = MatchRow {
            id: Uuid::new_v4(),
            company_user_id: pair.company_user_id,
            jobseeker_user_id: pair.jobseeker_user_id,
            matched_by,
            matched_at: Utc::now(),
        };
        matches.push(row.clone());
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRow>, StoreError> {
        let matches = self.matches.lock().await;
        let mine: Vec<MatchRow> = matches
            .iter()
            .filter(|m| m.company_user_id == user_id || m.jobseeker_user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(&mine, |m| m.matched_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::like::Role;

    fn like(sender: Uuid, receiver: Uuid, sender_type: Role) -> NewLike {
        NewLike {
            sender_user_id: sender,
            receiver_user_id: receiver,
            sender_type,
        }
    }

    #[tokio::test]
    async fn test_second_like_same_direction_is_not_duplicated() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let first = store.insert_like(like(a, b, Role::Jobseeker)).await.unwrap();
        let second = store.insert_like(like(a, b, Role::Jobseeker)).await.unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.row().id, second.row().id);
        assert_eq!(store.like_count().await, 1);
    }

    #[tokio::test]
    async fn test_opposite_directions_are_distinct_likes() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        store.insert_like(like(a, b, Role::Jobseeker)).await.unwrap();
        store.insert_like(like(b, a, Role::Company)).await.unwrap();

        assert_eq!(store.like_count().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_match_insert_conflicts() {
        let store = MemoryStore::new();
        let pair = MatchPair {
            company_user_id: Uuid::new_v4(),
            jobseeker_user_id: Uuid::new_v4(),
        };

        store.insert_match(pair, MatchedBy::Auto).await.unwrap();
        let err = store
            .insert_match(pair, MatchedBy::CompanyReply)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict));
        assert_eq!(store.match_count().await, 1);
    }

    #[tokio::test]
    async fn test_list_for_user_is_newest_first() {
        let store = MemoryStore::new();
        let company = Uuid::new_v4();
        let older = Uuid::new_v4();
        let newer = Uuid::new_v4();

        for jobseeker in [older, newer] {
            let pair = MatchPair {
                company_user_id: company,
                jobseeker_user_id: jobseeker,
            };
            store.insert_match(pair, MatchedBy::Auto).await.unwrap();
        }

        let listed = store.list_for_user(company).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].jobseeker_user_id, newer);
        assert_eq!(listed[1].jobseeker_user_id, older);
    }
}
