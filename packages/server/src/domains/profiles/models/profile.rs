use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{EngineResult, ProfileId};
use crate::domains::profiles::eligibility;

/// Platform role. Closed set - dispatch goes through the capability helpers,
/// never through raw string comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Counsellor,
    Admin,
}

impl Role {
    /// Only patients may request a counsellor match.
    pub fn can_request_match(&self) -> bool {
        matches!(self, Role::Patient)
    }

    /// Counsellor approval/suspension is an admin capability.
    pub fn can_manage_counsellors(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Counsellor => write!(f, "counsellor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "patient" => Ok(Role::Patient),
            "counsellor" => Ok(Role::Counsellor),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Recorded gender, used by the gender-matched support policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(anyhow::anyhow!("Invalid gender: {}", s)),
        }
    }
}

/// Profile model - SQL persistence layer
///
/// One row per person on the platform. Never physically deleted; `is_active`
/// is the soft-deactivation flag.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,

    // Matching eligibility fields
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,

    pub role: String, // Maps to Role enum
    pub is_verified: bool,
    pub profile_completed: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields settable at signup.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub gender: Option<Gender>,
}

/// Patch applied by the owner or an admin. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}

impl Profile {
    /// Find profile by ID
    pub async fn find_by_id(id: ProfileId, pool: &PgPool) -> EngineResult<Option<Self>> {
        let profile = sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(profile)
    }

    /// Find profile by identity reference
    pub async fn find_by_user(user_id: Uuid, pool: &PgPool) -> EngineResult<Option<Self>> {
        let profile = sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(profile)
    }

    /// Insert a new profile (created at signup)
    pub async fn create(new: NewProfile, pool: &PgPool) -> EngineResult<Self> {
        let profile = sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (id, user_id, email, full_name, role, gender)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ProfileId::new())
        .bind(new.user_id)
        .bind(&new.email)
        .bind(&new.full_name)
        .bind(new.role.to_string())
        .bind(new.gender.map(|g| g.to_string()))
        .fetch_one(pool)
        .await?;
        Ok(profile)
    }

    /// Apply a patch and recompute `profile_completed`.
    ///
    /// Completion for a patient means the matching-eligibility fields are all
    /// present and the age requirement holds; other roles are complete once
    /// they exist. Both writes commit together, so the flag is never stale
    /// relative to the fields.
    pub async fn update_details(
        id: ProfileId,
        patch: ProfilePatch,
        pool: &PgPool,
    ) -> EngineResult<Option<Self>> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Self>(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url),
                phone = COALESCE($4, phone),
                date_of_birth = COALESCE($5, date_of_birth),
                gender = COALESCE($6, gender),
                emergency_contact = COALESCE($7, emergency_contact),
                emergency_phone = COALESCE($8, emergency_phone),
                updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(patch.full_name)
        .bind(patch.avatar_url)
        .bind(patch.phone)
        .bind(patch.date_of_birth)
        .bind(patch.gender.map(|g| g.to_string()))
        .bind(patch.emergency_contact)
        .bind(patch.emergency_phone)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        let completed = match updated.role.parse::<Role>() {
            Ok(Role::Patient) => eligibility::check_eligibility(&updated).eligible,
            _ => true,
        };

        let profile = sqlx::query_as::<_, Self>(
            "UPDATE profiles SET profile_completed = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(completed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(profile))
    }

    /// Soft-deactivate a profile (profiles are never physically deleted)
    pub async fn deactivate(id: ProfileId, pool: &PgPool) -> EngineResult<u64> {
        let result =
            sqlx::query("UPDATE profiles SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// All active patients, newest first (admin oversight listing)
    pub async fn list_patients(pool: &PgPool) -> EngineResult<Vec<Self>> {
        let profiles = sqlx::query_as::<_, Self>(
            "SELECT * FROM profiles
             WHERE role = 'patient' AND is_active = TRUE
             ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in ["patient", "counsellor", "admin"] {
            assert_eq!(role.parse::<Role>().unwrap().to_string(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_gender_roundtrip() {
        for gender in ["male", "female", "other"] {
            assert_eq!(gender.parse::<Gender>().unwrap().to_string(), gender);
        }
    }

    #[test]
    fn test_capabilities() {
        assert!(Role::Patient.can_request_match());
        assert!(!Role::Counsellor.can_request_match());
        assert!(Role::Admin.can_manage_counsellors());
        assert!(!Role::Patient.can_manage_counsellors());
    }
}
