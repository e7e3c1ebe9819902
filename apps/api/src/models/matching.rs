use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::like::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum MatchedBy {
    /// Jobseeker's skills covered the company's requirements.
    Auto,
    /// The other side had already liked the sender.
    CompanyReply,
}

/// A confirmed mutual match. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub company_user_id: Uuid,
    pub jobseeker_user_id: Uuid,
    pub matched_by: MatchedBy,
    pub matched_at: DateTime<Utc>,
}

impl MatchRow {
    pub fn pair(&self) -> MatchPair {
        MatchPair {
            company_user_id: self.company_user_id,
            jobseeker_user_id: self.jobseeker_user_id,
        }
    }

    /// The other participant from `user_id`'s point of view.
    pub fn counterpart_of(&self, user_id: Uuid) -> (Uuid, Role) {
        self.pair().counterpart_of(user_id)
    }
}

/// A user pair normalized to (company, jobseeker) roles, whichever side acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPair {
    pub company_user_id: Uuid,
    pub jobseeker_user_id: Uuid,
}

impl MatchPair {
    pub fn from_like(sender: Uuid, receiver: Uuid, sender_type: Role) -> Self {
        match sender_type {
            Role::Jobseeker => MatchPair {
                company_user_id: receiver,
                jobseeker_user_id: sender,
            },
            Role::Company => MatchPair {
                company_user_id: sender,
                jobseeker_user_id: receiver,
            },
        }
    }

    pub fn counterpart_of(&self, user_id: Uuid) -> (Uuid, Role) {
        if user_id == self.company_user_id {
            (self.jobseeker_user_id, Role::Jobseeker)
        } else {
            (self.company_user_id, Role::Company)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_normalized_regardless_of_sender() {
        let jobseeker = Uuid::new_v4();
        let company = Uuid::new_v4();
        assert_eq!(
            MatchPair::from_like(jobseeker, company, Role::Jobseeker),
            MatchPair::from_like(company, jobseeker, Role::Company),
        );
    }

    #[test]
    fn test_counterpart_resolves_both_sides() {
        let pair = MatchPair {
            company_user_id: Uuid::new_v4(),
            jobseeker_user_id: Uuid::new_v4(),
        };
        assert_eq!(
            pair.counterpart_of(pair.company_user_id),
            (pair.jobseeker_user_id, Role::Jobseeker)
        );
        assert_eq!(
            pair.counterpart_of(pair.jobseeker_user_id),
            (pair.company_user_id, Role::Company)
        );
    }

    #[test]
    fn test_matched_by_wire_format() {
        assert_eq!(
            serde_json::to_string(&MatchedBy::CompanyReply).unwrap(),
            "\"company_reply\""
        );
        assert_eq!(serde_json::to_string(&MatchedBy::Auto).unwrap(), "\"auto\"");
    }
}
