use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::common::{AssignmentId, ConversationId, CounsellorId, EngineResult, ProfileId};
use crate::domains::assignments::models::Assignment;

/// Conversation model - SQL persistence layer
///
/// One communication channel per patient-counsellor pair, keyed by the
/// assignment that opened it. The UNIQUE constraint on `assignment_id` makes
/// creation idempotent.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub patient_id: ProfileId,
    pub counsellor_id: CounsellorId,
    pub assignment_id: Option<AssignmentId>,
    pub is_active: bool,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Get or create the conversation for an assignment.
    ///
    /// ON CONFLICT DO NOTHING plus a follow-up read: the boolean is `true`
    /// only for the caller that actually inserted the row, so one-shot side
    /// effects (the counsellor notification) fire exactly once.
    pub async fn get_or_create_for_assignment(
        assignment: &Assignment,
        pool: &PgPool,
    ) -> EngineResult<(Self, bool)> {
        let inserted = sqlx::query_as::<_, Self>(
            "INSERT INTO conversations (id, patient_id, counsellor_id, assignment_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (assignment_id) DO NOTHING
             RETURNING *",
        )
        .bind(ConversationId::new())
        .bind(assignment.patient_id)
        .bind(assignment.counsellor_id)
        .bind(assignment.id)
        .fetch_optional(pool)
        .await?;

        if let Some(conversation) = inserted {
            return Ok((conversation, true));
        }

        let existing = sqlx::query_as::<_, Self>(
            "SELECT * FROM conversations WHERE assignment_id = $1",
        )
        .bind(assignment.id)
        .fetch_one(pool)
        .await?;
        Ok((existing, false))
    }

    /// Find conversation by ID
    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> EngineResult<Option<Self>> {
        let conversation = sqlx::query_as::<_, Self>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(conversation)
    }

    /// Lock the conversation row.
    ///
    /// Message appends on the same conversation serialize on this lock, which
    /// is what makes the sequence numbers gap-free and totally ordered.
    pub async fn lock_by_id(
        id: ConversationId,
        conn: &mut PgConnection,
    ) -> EngineResult<Option<Self>> {
        let conversation =
            sqlx::query_as::<_, Self>("SELECT * FROM conversations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        Ok(conversation)
    }

    /// All conversations a profile participates in, most recently active
    /// first. Counsellors participate through their counsellor record.
    pub async fn list_for_profile(
        profile_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<Vec<Self>> {
        let conversations = sqlx::query_as::<_, Self>(
            "SELECT * FROM conversations
             WHERE patient_id = $1
                OR counsellor_id IN (SELECT id FROM counsellors WHERE profile_id = $1)
             ORDER BY last_message_at DESC",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await?;
        Ok(conversations)
    }

    /// Profile id behind the counsellor side of this conversation
    pub async fn counsellor_profile_id(
        &self,
        conn: &mut PgConnection,
    ) -> EngineResult<ProfileId> {
        let (profile_id,): (ProfileId,) =
            sqlx::query_as("SELECT profile_id FROM counsellors WHERE id = $1")
                .bind(self.counsellor_id)
                .fetch_one(conn)
                .await?;
        Ok(profile_id)
    }

    /// Bump `last_message_at` after an append
    pub async fn touch_activity(
        id: ConversationId,
        at: DateTime<Utc>,
        conn: &mut PgConnection,
    ) -> EngineResult<()> {
        sqlx::query(
            "UPDATE conversations SET last_message_at = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Close the conversation when its assignment leaves the active state
    pub async fn deactivate_for_assignment(
        assignment_id: AssignmentId,
        conn: &mut PgConnection,
    ) -> EngineResult<()> {
        sqlx::query(
            "UPDATE conversations SET is_active = FALSE, updated_at = NOW()
             WHERE assignment_id = $1",
        )
        .bind(assignment_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}
