use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The two participant roles. Every like and match pairs one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum Role {
    Jobseeker,
    Company,
}

impl Role {
    pub fn opposite(self) -> Role {
        match self {
            Role::Jobseeker => Role::Company,
            Role::Company => Role::Jobseeker,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Jobseeker => "jobseeker",
            Role::Company => "company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-directional expression of interest. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub sender_user_id: Uuid,
    pub receiver_user_id: Uuid,
    pub sender_type: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewLike {
    pub sender_user_id: Uuid,
    pub receiver_user_id: Uuid,
    pub sender_type: Role,
}
