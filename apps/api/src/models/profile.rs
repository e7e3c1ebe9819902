use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::like::Role;

const UNKNOWN_NAME: &str = "Unknown";

// Rows below belong to the profile service; this crate only reads them.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobseekerProfileRow {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub desired_role: Option<String>,
    /// Comma-delimited, free-form.
    pub skills: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyProfileRow {
    pub user_id: Uuid,
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub job_title: Option<String>,
    /// Comma-delimited, free-form.
    pub required_skills: String,
    pub created_at: DateTime<Utc>,
}

/// What a confirmation screen or match list shows about the other side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayProfile {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
    pub image_url: Option<String>,
    pub headline: Option<String>,
}

impl DisplayProfile {
    pub fn placeholder(user_id: Uuid, role: Role) -> Self {
        DisplayProfile {
            user_id,
            role,
            name: UNKNOWN_NAME.to_string(),
            image_url: None,
            headline: None,
        }
    }
}

impl From<JobseekerProfileRow> for DisplayProfile {
    fn from(row: JobseekerProfileRow) -> Self {
        DisplayProfile {
            user_id: row.user_id,
            role: Role::Jobseeker,
            name: non_blank(row.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            image_url: non_blank(row.image_url),
            headline: non_blank(row.desired_role),
        }
    }
}

impl From<CompanyProfileRow> for DisplayProfile {
    fn from(row: CompanyProfileRow) -> Self {
        DisplayProfile {
            user_id: row.user_id,
            role: Role::Company,
            name: non_blank(row.company_name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            image_url: non_blank(row.logo_url),
            headline: non_blank(row.job_title),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
