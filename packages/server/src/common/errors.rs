use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A required profile field that is missing or invalid for matching.
///
/// Returned as data rather than an error message so callers can render
/// field-level guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Phone,
    DateOfBirth,
    Underage,
    Gender,
    EmergencyContact,
    EmergencyPhone,
    NotAPatient,
}

/// Engine error taxonomy.
///
/// Every public operation returns one of these; nothing here is fatal to a
/// running service instance.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("profile is not eligible for matching")]
    Ineligible { missing: Vec<MissingField> },

    #[error("no available counsellor matches the request")]
    NoCandidate,

    #[error("patient already has an active assignment")]
    AlreadyAssigned,

    #[error("counsellor is at capacity")]
    CapacityExceeded,

    #[error("assignment is no longer active")]
    AssignmentNotActive,

    #[error("{0} is not a participant in this conversation")]
    NotAParticipant(&'static str),

    #[error("conversation is closed")]
    ConversationClosed,

    #[error("actor lacks permission for this operation")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// True when the given sqlx error is a unique violation on the named
    /// constraint. Used to map races on partial unique indexes to conflicts.
    pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
        match err {
            sqlx::Error::Database(db) => {
                db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_serializes_snake_case() {
        let json = serde_json::to_string(&MissingField::EmergencyContact).unwrap();
        assert_eq!(json, "\"emergency_contact\"");
    }

    #[test]
    fn test_error_messages_are_stable() {
        let err = EngineError::AlreadyAssigned;
        assert_eq!(err.to_string(), "patient already has an active assignment");
    }
}
