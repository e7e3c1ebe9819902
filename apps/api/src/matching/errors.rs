use thiserror::Error;
use uuid::Uuid;

use crate::matching::store::StoreError;
use crate::models::like::Role;

/// Failures `record_like` reports to its caller.
///
/// A unique-violation race on the match insert never appears here: the engine
/// recovers it by reading back the winner's row.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no {role} profile found for user {user_id}")]
    ProfileNotFound { user_id: Uuid, role: Role },

    #[error("users {sender} and {receiver} do not form a jobseeker/company pair")]
    InvalidRoleCombination { sender: Uuid, receiver: Uuid },

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ProfileNotFound,
    InvalidRoleCombination,
    PersistenceError,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ProfileNotFound => "PROFILE_NOT_FOUND",
            ErrorKind::InvalidRoleCombination => "INVALID_ROLE_COMBINATION",
            ErrorKind::PersistenceError => "PERSISTENCE_ERROR",
        }
    }

    /// Whether retrying the same call can succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::PersistenceError)
    }
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::ProfileNotFound { .. } => ErrorKind::ProfileNotFound,
            MatchError::InvalidRoleCombination { .. } => ErrorKind::InvalidRoleCombination,
            MatchError::Persistence(_) => ErrorKind::PersistenceError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_persistence_errors_are_retryable() {
        let not_found = MatchError::ProfileNotFound {
            user_id: Uuid::new_v4(),
            role: Role::Company,
        };
        let persistence = MatchError::from(StoreError::Unavailable("pool closed".to_string()));

        assert!(!not_found.kind().is_retryable());
        assert!(persistence.kind().is_retryable());
    }

    #[test]
    fn test_error_kinds_map_to_wire_codes() {
        assert_eq!(ErrorKind::ProfileNotFound.code(), "PROFILE_NOT_FOUND");
        assert_eq!(
            ErrorKind::InvalidRoleCombination.code(),
            "INVALID_ROLE_COMBINATION"
        );
        assert_eq!(ErrorKind::PersistenceError.code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_profile_not_found_message_names_role() {
        let user_id = Uuid::new_v4();
        let err = MatchError::ProfileNotFound {
            user_id,
            role: Role::Jobseeker,
        };
        assert_eq!(
            err.to_string(),
            format!("no jobseeker profile found for user {user_id}")
        );
    }
}
