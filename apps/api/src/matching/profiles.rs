//! Profile Lookup: read-only access to the profile service's tables.
//!
//! The engine only needs skill sets (to validate participants and evaluate the
//! auto-match rule) and a display card for confirmation screens.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::matching::skills::SkillSet;
use crate::matching::store::StoreError;
use crate::models::like::Role;
use crate::models::profile::{CompanyProfileRow, DisplayProfile, JobseekerProfileRow};

#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// `None` when no jobseeker profile exists for `user_id`.
    async fn jobseeker_skills(&self, user_id: Uuid) -> Result<Option<SkillSet>, StoreError>;

    /// `None` when no company profile exists for `user_id`.
    async fn company_required_skills(&self, user_id: Uuid)
        -> Result<Option<SkillSet>, StoreError>;

    async fn display_profile(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<DisplayProfile>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres adapter
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProfiles {
    pool: PgPool,
}

impl PgProfiles {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileLookup for PgProfiles {
    async fn jobseeker_skills(&self, user_id: Uuid) -> Result<Option<SkillSet>, StoreError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT skills FROM jobseeker_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(raw.as_deref().map(SkillSet::parse))
    }

    async fn company_required_skills(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SkillSet>, StoreError> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT required_skills FROM company_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(raw.as_deref().map(SkillSet::parse))
    }

    async fn display_profile(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<DisplayProfile>, StoreError> {
        let profile = match role {
            Role::Jobseeker => sqlx::query_as::<_, JobseekerProfileRow>(
                "SELECT * FROM jobseeker_profiles WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(DisplayProfile::from),
            Role::Company => sqlx::query_as::<_, CompanyProfileRow>(
                "SELECT * FROM company_profiles WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(DisplayProfile::from),
        };
        Ok(profile)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TTL cache
// ────────────────────────────────────────────────────────────────────────────

struct CachedSkills {
    skills: SkillSet,
    fetched_at: Instant,
}

/// Caches skill sets in front of any [`ProfileLookup`].
///
/// Profile edits need not affect likes already recorded, so serving a stale
/// skill set for up to `ttl` is acceptable. Misses are never cached: a profile
/// created a moment ago must be visible on the next like. Display profiles
/// pass straight through.
pub struct CachedProfiles<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<(Uuid, Role), CachedSkills>>,
}

impl<P: ProfileLookup> CachedProfiles<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn skills_with<F, Fut>(
        &self,
        user_id: Uuid,
        role: Role,
        fetch: F,
    ) -> Result<Option<SkillSet>, StoreError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<SkillSet>, StoreError>> + Send,
    {
        if self.ttl.is_zero() {
            return fetch().await;
        }

        let key = (user_id, role);
        if let Some(hit) = self.entries.read().await.get(&key) {
            if hit.fetched_at.elapsed() < self.ttl {
                return Ok(Some(hit.skills.clone()));
            }
        }

        let fetched = fetch().await?;
        let mut entries = self.entries.write().await;
        match &fetched {
            Some(skills) => {
                entries.insert(
                    key,
                    CachedSkills {
                        skills: skills.clone(),
                        fetched_at: Instant::now(),
                    },
                );
            }
            None => {
                entries.remove(&key);
            }
        }
        debug!("Profile cache refreshed for {role} {user_id}");
        Ok(fetched)
    }
}

#[async_trait]
impl<P: ProfileLookup> ProfileLookup for CachedProfiles<P> {
    async fn jobseeker_skills(&self, user_id: Uuid) -> Result<Option<SkillSet>, StoreError> {
        self.skills_with(user_id, Role::Jobseeker, || {
            self.inner.jobseeker_skills(user_id)
        })
        .await
    }

    async fn company_required_skills(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SkillSet>, StoreError> {
        self.skills_with(user_id, Role::Company, || {
            self.inner.company_required_skills(user_id)
        })
        .await
    }

    async fn display_profile(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<DisplayProfile>, StoreError> {
        self.inner.display_profile(user_id, role).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test fixtures
// ────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::fixtures::StaticProfiles;
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_cache_serves_hits_within_ttl() {
        let profiles = StaticProfiles::new();
        let id = profiles.add_jobseeker("Ada", "rust, sql");
        let cached = CachedProfiles::new(profiles, Duration::from_secs(60));

        let first = cached.jobseeker_skills(id).await.unwrap().unwrap();
        let second = cached.jobseeker_skills(id).await.unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner.lookups(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_refetches_after_ttl() {
        let profiles = StaticProfiles::new();
        let id = profiles.add_company("Acme", "python");
        let cached = CachedProfiles::new(profiles, Duration::from_secs(60));

        cached.company_required_skills(id).await.unwrap();
        cached.inner.set_company(id, "Acme", "python, rust");
        tokio::time::advance(Duration::from_secs(61)).await;
        let refreshed = cached.company_required_skills(id).await.unwrap().unwrap();

        assert_eq!(cached.inner.lookups(), 2);
        assert!(refreshed.contains("rust"));
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let profiles = StaticProfiles::new();
        let id = Uuid::new_v4();
        let cached = CachedProfiles::new(profiles, Duration::from_secs(60));

        assert!(cached.jobseeker_skills(id).await.unwrap().is_none());
        cached.inner.set_jobseeker(id, "Grace", "cobol");

        assert!(cached.jobseeker_skills(id).await.unwrap().is_some());
        assert_eq!(cached.inner.lookups(), 2);
    }

    #[tokio::test]
    async fn test_roles_are_cached_separately() {
        let profiles = StaticProfiles::new();
        let id = profiles.add_jobseeker("Linus", "c");
        let cached = CachedProfiles::new(profiles, Duration::from_secs(60));

        assert!(cached.jobseeker_skills(id).await.unwrap().is_some());
        assert!(cached.company_required_skills(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_passes_through() {
        let profiles = StaticProfiles::new();
        let id = profiles.add_jobseeker("Ada", "rust");
        let cached = CachedProfiles::new(profiles, Duration::ZERO);

        cached.jobseeker_skills(id).await.unwrap();
        cached.jobseeker_skills(id).await.unwrap();

        assert_eq!(cached.inner.lookups(), 2);
    }
}
