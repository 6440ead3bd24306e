//! Message append and read-receipt actions.

use tracing::{info, warn};

use crate::common::{ConversationId, EngineError, EngineResult, ProfileId};
use crate::domains::conversations::events::ChatEvent;
use crate::domains::conversations::models::{Conversation, Message, MessageType};
use crate::domains::notifications::models::{NewNotification, NotificationType};
use crate::domains::profiles::models::Profile;
use crate::kernel::ServerDeps;

/// Append a message to a conversation.
///
/// The conversation row lock serializes concurrent appends, so sequence
/// numbers come out gap-free regardless of interleaving. `recipient_active`
/// says whether the other participant currently has the conversation open;
/// when they don't, a "New Message" notification is enqueued best-effort.
pub async fn send_message(
    conversation_id: ConversationId,
    sender_id: ProfileId,
    content: &str,
    message_type: MessageType,
    recipient_active: bool,
    deps: &ServerDeps,
) -> EngineResult<Message> {
    if content.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "message content must not be empty".to_string(),
        ));
    }

    let mut tx = deps.db_pool().begin().await?;

    let conversation = Conversation::lock_by_id(conversation_id, &mut tx)
        .await?
        .ok_or(EngineError::NotFound("conversation"))?;

    if !conversation.is_active {
        return Err(EngineError::ConversationClosed);
    }

    let counsellor_profile_id = conversation.counsellor_profile_id(&mut tx).await?;
    if sender_id != conversation.patient_id && sender_id != counsellor_profile_id {
        return Err(EngineError::NotAParticipant("sender"));
    }

    let sequence_number = Message::next_sequence_number(conversation_id, &mut tx).await?;
    let message = Message::create(
        conversation_id,
        sender_id,
        content,
        message_type,
        sequence_number,
        &mut tx,
    )
    .await?;
    Conversation::touch_activity(conversation_id, message.created_at, &mut tx).await?;

    tx.commit().await?;

    info!(
        conversation_id = %conversation_id,
        message_id = %message.id,
        sequence_number,
        "Message appended"
    );

    let event = ChatEvent::MessageAppended {
        message: message.clone(),
    };
    deps.publish(&event.topic(), &event).await;

    if !recipient_active {
        let recipient_id = if sender_id == conversation.patient_id {
            counsellor_profile_id
        } else {
            conversation.patient_id
        };
        if let Err(e) = notify_recipient(recipient_id, sender_id, deps).await {
            warn!(
                conversation_id = %conversation_id,
                error = %e,
                "Failed to deliver message notification"
            );
        }
    }

    Ok(message)
}

async fn notify_recipient(
    recipient_id: ProfileId,
    sender_id: ProfileId,
    deps: &ServerDeps,
) -> EngineResult<()> {
    let sender = Profile::find_by_id(sender_id, deps.db_pool())
        .await?
        .ok_or(EngineError::NotFound("profile"))?;
    let notification = NewNotification {
        recipient_id,
        title: "New Message".to_string(),
        body: format!("You have a new message from {}", sender.full_name),
        notification_type: NotificationType::Message,
        action_url: Some("/messages".to_string()),
    };
    deps.notifier().enqueue(&notification).await?;
    Ok(())
}

/// Mark every message from the other participant as read.
///
/// Idempotent; returns how many messages actually flipped.
pub async fn mark_conversation_read(
    conversation_id: ConversationId,
    reader_id: ProfileId,
    deps: &ServerDeps,
) -> EngineResult<u64> {
    let pool = deps.db_pool();

    let conversation = Conversation::find_by_id(conversation_id, pool)
        .await?
        .ok_or(EngineError::NotFound("conversation"))?;

    let mut conn = pool.acquire().await?;
    let counsellor_profile_id = conversation.counsellor_profile_id(&mut conn).await?;
    drop(conn);

    if reader_id != conversation.patient_id && reader_id != counsellor_profile_id {
        return Err(EngineError::NotAParticipant("reader"));
    }

    Message::mark_read(conversation_id, reader_id, pool).await
}
