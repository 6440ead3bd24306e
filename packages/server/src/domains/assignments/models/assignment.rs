use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{AssignmentId, CounsellorId, EngineError, EngineResult, ProfileId};

/// Named constraint backing the one-active-assignment-per-patient invariant.
pub const ONE_ACTIVE_CONSTRAINT: &str = "uq_counsellor_assignments_one_active";

/// Assignment lifecycle status.
///
/// `active -> completed` and `active -> cancelled` are the only transitions;
/// both targets are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AssignmentStatus::Active)
    }

    pub fn can_transition_to(&self, next: AssignmentStatus) -> bool {
        matches!(self, AssignmentStatus::Active) && next.is_terminal()
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Completed => write!(f, "completed"),
            AssignmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "active" => Ok(AssignmentStatus::Active),
            "completed" => Ok(AssignmentStatus::Completed),
            "cancelled" => Ok(AssignmentStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid assignment status: {}", s)),
        }
    }
}

/// Assignment model - SQL persistence layer
///
/// The record pairing one patient to one counsellor for an episode of care.
/// Once non-active it is immutable history.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub patient_id: ProfileId,
    pub counsellor_id: CounsellorId,
    pub status: String, // Maps to AssignmentStatus
    pub assigned_by: Option<ProfileId>,
    pub assigned_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Insert an active assignment inside a match transaction.
    ///
    /// A unique violation on the partial active index means another request
    /// won the race for this patient; that surfaces as `AlreadyAssigned`.
    pub async fn insert(
        patient_id: ProfileId,
        counsellor_id: CounsellorId,
        assigned_by: Option<ProfileId>,
        conn: &mut PgConnection,
    ) -> EngineResult<Self> {
        let result = sqlx::query_as::<_, Self>(
            "INSERT INTO counsellor_assignments (id, patient_id, counsellor_id, status, assigned_by)
             VALUES ($1, $2, $3, 'active', $4)
             RETURNING *",
        )
        .bind(AssignmentId::new())
        .bind(patient_id)
        .bind(counsellor_id)
        .bind(assigned_by)
        .fetch_one(conn)
        .await;

        match result {
            Ok(assignment) => Ok(assignment),
            Err(e) if EngineError::is_unique_violation(&e, ONE_ACTIVE_CONSTRAINT) => {
                Err(EngineError::AlreadyAssigned)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find assignment by ID
    pub async fn find_by_id(id: AssignmentId, pool: &PgPool) -> EngineResult<Option<Self>> {
        let assignment =
            sqlx::query_as::<_, Self>("SELECT * FROM counsellor_assignments WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(assignment)
    }

    /// Lock an assignment row for a lifecycle transition
    pub async fn lock_by_id(
        id: AssignmentId,
        conn: &mut PgConnection,
    ) -> EngineResult<Option<Self>> {
        let assignment = sqlx::query_as::<_, Self>(
            "SELECT * FROM counsellor_assignments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(assignment)
    }

    /// The patient's current active assignment, if any
    pub async fn find_active_for_patient(
        patient_id: ProfileId,
        conn: &mut PgConnection,
    ) -> EngineResult<Option<Self>> {
        let assignment = sqlx::query_as::<_, Self>(
            "SELECT * FROM counsellor_assignments
             WHERE patient_id = $1 AND status = 'active'",
        )
        .bind(patient_id)
        .fetch_optional(conn)
        .await?;
        Ok(assignment)
    }

    /// Count of active assignments for a counsellor.
    ///
    /// Must always equal the counsellor's `current_patients`.
    pub async fn count_active_for_counsellor(
        counsellor_id: CounsellorId,
        pool: &PgPool,
    ) -> EngineResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM counsellor_assignments
             WHERE counsellor_id = $1 AND status = 'active'",
        )
        .bind(counsellor_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Assignment history for a patient, newest first
    pub async fn find_by_patient(
        patient_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<Vec<Self>> {
        let assignments = sqlx::query_as::<_, Self>(
            "SELECT * FROM counsellor_assignments
             WHERE patient_id = $1
             ORDER BY created_at DESC",
        )
        .bind(patient_id)
        .fetch_all(pool)
        .await?;
        Ok(assignments)
    }

    /// Transition to a terminal status inside a lifecycle transaction.
    /// `completed_at` records when the episode of care ended, for either
    /// terminal status.
    pub async fn mark_terminal(
        id: AssignmentId,
        status: AssignmentStatus,
        conn: &mut PgConnection,
    ) -> EngineResult<Self> {
        let assignment = sqlx::query_as::<_, Self>(
            "UPDATE counsellor_assignments
             SET status = $2, completed_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_one(conn)
        .await?;
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in ["active", "completed", "cancelled"] {
            assert_eq!(status.parse::<AssignmentStatus>().unwrap().to_string(), status);
        }
    }

    #[test]
    fn test_state_machine_transitions() {
        use AssignmentStatus::*;
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        // Terminal statuses are immutable history
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Active.can_transition_to(Active));
    }
}
