use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{CounsellorId, EngineResult, ProfileId};
use crate::domains::profiles::models::Gender;

/// Approval status for a counsellor. Only approved counsellors can appear in
/// the candidate pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CounsellorStatus {
    Pending,
    Approved,
    Suspended,
    Rejected,
}

impl std::fmt::Display for CounsellorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounsellorStatus::Pending => write!(f, "pending"),
            CounsellorStatus::Approved => write!(f, "approved"),
            CounsellorStatus::Suspended => write!(f, "suspended"),
            CounsellorStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for CounsellorStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(CounsellorStatus::Pending),
            "approved" => Ok(CounsellorStatus::Approved),
            "suspended" => Ok(CounsellorStatus::Suspended),
            "rejected" => Ok(CounsellorStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid counsellor status: {}", s)),
        }
    }
}

/// Counsellor model - SQL persistence layer
///
/// `current_patients` must equal the count of this counsellor's active
/// assignments at all times; it only changes inside the same transaction as
/// the assignment write.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Counsellor {
    pub id: CounsellorId,
    pub profile_id: ProfileId,
    pub gender: String,
    pub status: String, // Maps to CounsellorStatus
    pub is_available: bool,

    // Capacity
    pub max_patients: i32,
    pub current_patients: i32,

    pub rating: f64,
    pub total_reviews: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields settable when a counsellor registers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCounsellor {
    pub profile_id: ProfileId,
    pub gender: Gender,
    pub max_patients: i32,
}

// Candidate pool predicate and ordering. Rating DESC then load ASC keeps
// distribution even among equally-rated counsellors; id ASC makes the
// ordering total.
const CANDIDATE_QUERY: &str = "SELECT * FROM counsellors
     WHERE status = 'approved'
       AND is_available = TRUE
       AND current_patients < max_patients
       AND gender = $1
     ORDER BY rating DESC, current_patients ASC, id ASC";

impl Counsellor {
    /// Register a new counsellor (starts as pending, not yet matchable)
    pub async fn register(new: NewCounsellor, pool: &PgPool) -> EngineResult<Self> {
        let counsellor = sqlx::query_as::<_, Self>(
            "INSERT INTO counsellors (id, profile_id, gender, max_patients)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(CounsellorId::new())
        .bind(new.profile_id)
        .bind(new.gender.to_string())
        .bind(new.max_patients)
        .fetch_one(pool)
        .await?;
        Ok(counsellor)
    }

    /// Find counsellor by ID
    pub async fn find_by_id(id: CounsellorId, pool: &PgPool) -> EngineResult<Option<Self>> {
        let counsellor = sqlx::query_as::<_, Self>("SELECT * FROM counsellors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(counsellor)
    }

    /// Find counsellor by owning profile
    pub async fn find_by_profile(
        profile_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<Option<Self>> {
        let counsellor =
            sqlx::query_as::<_, Self>("SELECT * FROM counsellors WHERE profile_id = $1")
                .bind(profile_id)
                .fetch_optional(pool)
                .await?;
        Ok(counsellor)
    }

    /// All eligible match candidates for a gender, best-first.
    pub async fn find_candidates(gender: Gender, pool: &PgPool) -> EngineResult<Vec<Self>> {
        let candidates = sqlx::query_as::<_, Self>(CANDIDATE_QUERY)
            .bind(gender.to_string())
            .fetch_all(pool)
            .await?;
        Ok(candidates)
    }

    /// Lock the head candidate inside a match transaction.
    ///
    /// FOR UPDATE serializes concurrent match attempts on the same counsellor
    /// row; a waiter re-evaluates the capacity predicate once the lock holder
    /// commits.
    pub async fn lock_next_candidate(
        gender: Gender,
        conn: &mut PgConnection,
    ) -> EngineResult<Option<Self>> {
        let candidate =
            sqlx::query_as::<_, Self>(&format!("{CANDIDATE_QUERY} LIMIT 1 FOR UPDATE"))
                .bind(gender.to_string())
                .fetch_optional(conn)
                .await?;
        Ok(candidate)
    }

    /// Reserve one patient slot. Conditional write: returns `None` when the
    /// counsellor turned out to be full, so callers can map a lost race to a
    /// capacity error instead of over-booking.
    pub async fn reserve_slot(
        id: CounsellorId,
        conn: &mut PgConnection,
    ) -> EngineResult<Option<Self>> {
        let counsellor = sqlx::query_as::<_, Self>(
            "UPDATE counsellors
             SET current_patients = current_patients + 1, updated_at = NOW()
             WHERE id = $1
               AND current_patients < max_patients
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(counsellor)
    }

    /// Release one patient slot (assignment completed or cancelled).
    pub async fn release_slot(id: CounsellorId, conn: &mut PgConnection) -> EngineResult<()> {
        sqlx::query(
            "UPDATE counsellors
             SET current_patients = current_patients - 1, updated_at = NOW()
             WHERE id = $1
               AND current_patients > 0",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Update approval status (admin operation)
    pub async fn update_status(
        id: CounsellorId,
        status: CounsellorStatus,
        pool: &PgPool,
    ) -> EngineResult<Option<Self>> {
        let counsellor = sqlx::query_as::<_, Self>(
            "UPDATE counsellors SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status.to_string())
        .fetch_optional(pool)
        .await?;
        Ok(counsellor)
    }

    /// Toggle availability without touching approval status
    pub async fn set_availability(
        id: CounsellorId,
        is_available: bool,
        pool: &PgPool,
    ) -> EngineResult<Option<Self>> {
        let counsellor = sqlx::query_as::<_, Self>(
            "UPDATE counsellors SET is_available = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(is_available)
        .fetch_optional(pool)
        .await?;
        Ok(counsellor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in ["pending", "approved", "suspended", "rejected"] {
            assert_eq!(status.parse::<CounsellorStatus>().unwrap().to_string(), status);
        }
        assert!("retired".parse::<CounsellorStatus>().is_err());
    }
}
