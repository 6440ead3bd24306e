//! Open the communication channel for a fresh assignment.

use tracing::{info, warn};

use crate::common::{EngineError, EngineResult};
use crate::domains::assignments::models::Assignment;
use crate::domains::conversations::events::ChatEvent;
use crate::domains::conversations::models::Conversation;
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::domains::profiles::models::Profile;
use crate::kernel::ServerDeps;

/// Get or create the conversation for an assignment.
///
/// Idempotent by assignment id, so a caller repairing a failed fanout can
/// re-invoke it safely. The counsellor's "New Patient Assigned" notification
/// fires only on the invocation that created the row, and a sink failure is
/// logged without undoing anything.
pub async fn open_conversation(
    assignment: &Assignment,
    deps: &ServerDeps,
) -> EngineResult<Conversation> {
    let pool = deps.db_pool();

    let (conversation, created) =
        Conversation::get_or_create_for_assignment(assignment, pool).await?;

    if created {
        info!(
            conversation_id = %conversation.id,
            assignment_id = %assignment.id,
            "Conversation opened"
        );

        let event = ChatEvent::ConversationOpened {
            conversation_id: conversation.id,
            assignment_id: conversation.assignment_id,
        };
        deps.publish(&event.topic(), &event).await;

        let patient = Profile::find_by_id(assignment.patient_id, pool)
            .await?
            .ok_or(EngineError::NotFound("profile"))?;

        let mut conn = pool.acquire().await?;
        let counsellor_profile_id = conversation.counsellor_profile_id(&mut conn).await?;
        drop(conn);

        let notification = NewNotification {
            recipient_id: counsellor_profile_id,
            title: "New Patient Assigned".to_string(),
            body: format!("{} has been assigned to you", patient.full_name),
            notification_type: NotificationType::Assignment,
            action_url: Some("/messages".to_string()),
        };
        if let Err(e) = deps.notifier().enqueue(&notification).await {
            warn!(
                conversation_id = %conversation.id,
                error = %e,
                "Failed to deliver assignment notification"
            );
        }
    }

    Ok(conversation)
}
