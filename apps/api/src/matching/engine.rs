//! Matching Engine: turns one-directional likes into deduplicated matches.
//!
//! Per unordered (company, jobseeker) pair the state only moves forward:
//! `NoInteraction → OneSidedLike → Matched`. `Matched` is terminal.
//!
//! Decision order for a like from `sender` to `receiver`:
//! 1. Resolve both profiles (no writes if either is missing or roles clash).
//! 2. Insert-if-absent the like.
//! 3. Existing match for the pair → short-circuit, nothing new.
//! 4. Reply check: has the receiver already liked the sender? → `CompanyReply`.
//! 5. Jobseeker senders only: skill gate → `Auto`.
//!
//! The match insert relies on the store's uniqueness constraint; a concurrent
//! winner turns into a read-back of its row, never an error.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::matching::errors::MatchError;
use crate::matching::profiles::ProfileLookup;
use crate::matching::skills::{is_auto_match, SkillSet};
use crate::matching::store::{LikeStore, MatchStore, StoreError};
use crate::models::like::{LikeRow, NewLike, Role};
use crate::models::matching::{MatchPair, MatchRow, MatchedBy};
use crate::models::profile::DisplayProfile;

/// What the swipe UI receives after a like.
#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    pub success: bool,
    /// A match was created (or concurrently created) by this call.
    pub is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchedBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_counterpart_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<DisplayProfile>,
    /// The pair was matched before this call; nothing new to report.
    pub already_matched: bool,
}

impl LikeOutcome {
    fn recorded() -> Self {
        LikeOutcome {
            success: true,
            is_match: false,
            match_type: None,
            matched_counterpart_id: None,
            counterpart: None,
            already_matched: false,
        }
    }

    fn already_matched(existing: &MatchRow, sender: Uuid) -> Self {
        let (counterpart_id, _) = existing.counterpart_of(sender);
        LikeOutcome {
            success: true,
            is_match: false,
            match_type: Some(existing.matched_by),
            matched_counterpart_id: Some(counterpart_id),
            counterpart: None,
            already_matched: true,
        }
    }

    fn matched(row: &MatchRow, counterpart: DisplayProfile) -> Self {
        LikeOutcome {
            success: true,
            is_match: true,
            match_type: Some(row.matched_by),
            matched_counterpart_id: Some(counterpart.user_id),
            counterpart: Some(counterpart),
            already_matched: false,
        }
    }
}

/// A match as seen by one of its participants.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub record: MatchRow,
    pub counterpart: DisplayProfile,
}

/// Skill sets of both participants, resolved before any write.
struct Participants {
    jobseeker_skills: SkillSet,
    required_skills: SkillSet,
}

pub struct MatchingEngine {
    likes: Arc<dyn LikeStore>,
    matches: Arc<dyn MatchStore>,
    profiles: Arc<dyn ProfileLookup>,
}

impl MatchingEngine {
    pub fn new(
        likes: Arc<dyn LikeStore>,
        matches: Arc<dyn MatchStore>,
        profiles: Arc<dyn ProfileLookup>,
    ) -> Self {
        Self {
            likes,
            matches,
            profiles,
        }
    }

    /// Records `sender`'s like of `receiver` and decides whether it completes a match.
    ///
    /// Safe to retry: the like insert is idempotent and every decision re-reads
    /// current store state.
    pub async fn record_like(
        &self,
        sender: Uuid,
        receiver: Uuid,
        sender_type: Role,
    ) -> Result<LikeOutcome, MatchError> {
        if sender == receiver {
            return Err(MatchError::InvalidRoleCombination { sender, receiver });
        }

        let participants = self.resolve_participants(sender, receiver, sender_type).await?;

        let like = self
            .likes
            .insert_like(NewLike {
                sender_user_id: sender,
                receiver_user_id: receiver,
                sender_type,
            })
            .await?;
        let recorded = like.row();
        if like.is_new() {
            debug!("Recorded like {} from {sender} to {receiver}", recorded.id);
        } else {
            debug!(
                "Like {} from {sender} to {receiver} already recorded at {}; re-evaluating",
                recorded.id, recorded.created_at
            );
        }

        let pair = MatchPair::from_like(sender, receiver, sender_type);
        if let Some(existing) = self.matches.find_match(pair).await? {
            debug!("Pair {pair:?} already matched ({:?})", existing.matched_by);
            return Ok(LikeOutcome::already_matched(&existing, sender));
        }

        let decision = match sender_type {
            Role::Jobseeker => {
                self.decide_jobseeker_like(sender, receiver, &participants)
                    .await?
            }
            Role::Company => self.decide_company_like(sender, receiver).await?,
        };

        match decision {
            Some(matched_by) => self.create_match(pair, matched_by, sender).await,
            None => Ok(LikeOutcome::recorded()),
        }
    }

    /// Jobseeker → company: a reply always matches, otherwise the skill gate decides.
    async fn decide_jobseeker_like(
        &self,
        jobseeker: Uuid,
        company: Uuid,
        participants: &Participants,
    ) -> Result<Option<MatchedBy>, StoreError> {
        if self.likes.find_like(company, jobseeker).await?.is_some() {
            debug!("Jobseeker {jobseeker} replied to company {company}");
            return Ok(Some(MatchedBy::CompanyReply));
        }

        if is_auto_match(&participants.jobseeker_skills, &participants.required_skills) {
            debug!("Jobseeker {jobseeker} satisfies requirements of company {company}");
            return Ok(Some(MatchedBy::Auto));
        }

        debug!(
            "No match for {jobseeker} -> {company}; missing skills: {:?}",
            participants
                .required_skills
                .missing_from(&participants.jobseeker_skills)
        );
        Ok(None)
    }

    /// Company → jobseeker: only a reply matches. Skills are never evaluated here.
    async fn decide_company_like(
        &self,
        company: Uuid,
        jobseeker: Uuid,
    ) -> Result<Option<MatchedBy>, StoreError> {
        if self.likes.find_like(jobseeker, company).await?.is_some() {
            debug!("Company {company} replied to jobseeker {jobseeker}");
            return Ok(Some(MatchedBy::CompanyReply));
        }
        Ok(None)
    }

    async fn create_match(
        &self,
        pair: MatchPair,
        matched_by: MatchedBy,
        sender: Uuid,
    ) -> Result<LikeOutcome, MatchError> {
        let row = match self.matches.insert_match(pair, matched_by).await {
            Ok(row) => {
                info!(
                    "Match {} created for company {} / jobseeker {} ({:?})",
                    row.id, row.company_user_id, row.jobseeker_user_id, row.matched_by
                );
                row
            }
            Err(StoreError::Conflict) => {
                warn!("Concurrent match creation for {pair:?}; reading back the winner");
                self.matches.find_match(pair).await?.ok_or_else(|| {
                    StoreError::Unavailable(format!(
                        "match for {pair:?} conflicted but could not be read back"
                    ))
                })?
            }
            Err(e) => return Err(e.into()),
        };

        let (counterpart_id, counterpart_role) = row.counterpart_of(sender);
        let counterpart = self.display_profile(counterpart_id, counterpart_role).await;
        Ok(LikeOutcome::matched(&row, counterpart))
    }

    /// Resolves both skill sets, validating that the receiver holds the opposite role.
    async fn resolve_participants(
        &self,
        sender: Uuid,
        receiver: Uuid,
        sender_type: Role,
    ) -> Result<Participants, MatchError> {
        let sender_skills = self
            .skills_for(sender, sender_type)
            .await?
            .ok_or(MatchError::ProfileNotFound {
                user_id: sender,
                role: sender_type,
            })?;

        let receiver_role = sender_type.opposite();
        let Some(receiver_skills) = self.skills_for(receiver, receiver_role).await? else {
            if self.skills_for(receiver, sender_type).await?.is_some() {
                return Err(MatchError::InvalidRoleCombination { sender, receiver });
            }
            return Err(MatchError::ProfileNotFound {
                user_id: receiver,
                role: receiver_role,
            });
        };

        Ok(match sender_type {
            Role::Jobseeker => Participants {
                jobseeker_skills: sender_skills,
                required_skills: receiver_skills,
            },
            Role::Company => Participants {
                jobseeker_skills: receiver_skills,
                required_skills: sender_skills,
            },
        })
    }

    async fn skills_for(&self, user_id: Uuid, role: Role) -> Result<Option<SkillSet>, StoreError> {
        match role {
            Role::Jobseeker => self.profiles.jobseeker_skills(user_id).await,
            Role::Company => self.profiles.company_required_skills(user_id).await,
        }
    }

    /// Best-effort enrichment. A missing or failing profile yields a placeholder.
    async fn display_profile(&self, user_id: Uuid, role: Role) -> DisplayProfile {
        match self.profiles.display_profile(user_id, role).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!("No display profile for {role} {user_id}; using placeholder");
                DisplayProfile::placeholder(user_id, role)
            }
            Err(e) => {
                warn!("Display profile lookup failed for {role} {user_id}: {e}");
                DisplayProfile::placeholder(user_id, role)
            }
        }
    }

    /// All matches involving `user_id`, newest first.
    pub async fn list_matches(&self, user_id: Uuid) -> Result<Vec<MatchRow>, MatchError> {
        Ok(self.matches.list_for_user(user_id).await?)
    }

    /// [`Self::list_matches`] with each counterpart's display profile attached.
    pub async fn match_summaries(&self, user_id: Uuid) -> Result<Vec<MatchSummary>, MatchError> {
        let rows = self.list_matches(user_id).await?;
        let mut summaries = Vec::with_capacity(rows.len());
        for record in rows {
            let (counterpart_id, counterpart_role) = record.counterpart_of(user_id);
            let counterpart = self.display_profile(counterpart_id, counterpart_role).await;
            summaries.push(MatchSummary {
                record,
                counterpart,
            });
        }
        Ok(summaries)
    }

    /// Likes received by `user_id` that have not become a match, newest first.
    pub async fn list_pending_likes(&self, user_id: Uuid) -> Result<Vec<LikeRow>, MatchError> {
        let matched: HashSet<Uuid> = self
            .matches
            .list_for_user(user_id)
            .await?
            .iter()
            .map(|m| m.counterpart_of(user_id).0)
            .collect();

        let received = self.likes.list_received(user_id).await?;
        Ok(received
            .into_iter()
            .filter(|like| !matched.contains(&like.sender_user_id))
            .collect())
    }
}
