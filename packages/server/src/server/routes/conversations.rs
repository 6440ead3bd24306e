//! Conversation and message endpoints.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::{ConversationId, ProfileId};
use crate::domains::conversations::actions::{mark_conversation_read, send_message};
use crate::domains::conversations::models::{Conversation, Message, MessageType};
use crate::server::app::AppState;
use crate::server::error::ApiResult;

pub async fn list_conversations(
    Extension(state): Extension<AppState>,
    Path(profile_id): Path<ProfileId>,
) -> ApiResult<Json<Vec<Conversation>>> {
    let conversations =
        Conversation::list_for_profile(profile_id, state.deps.db_pool()).await?;
    Ok(Json(conversations))
}

pub async fn list_messages(
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<ConversationId>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = Message::list(conversation_id, state.deps.db_pool()).await?;
    Ok(Json(messages))
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub sender_id: ProfileId,
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: MessageType,
    /// Whether the recipient currently has the conversation open. When false,
    /// a "New Message" notification is enqueued for them.
    #[serde(default)]
    pub recipient_active: bool,
}

fn default_message_type() -> MessageType {
    MessageType::Text
}

pub async fn post_message(
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<ConversationId>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let message = send_message(
        conversation_id,
        request.sender_id,
        &request.content,
        request.message_type,
        request.recipient_active,
        &state.deps,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub reader_id: ProfileId,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub marked: u64,
}

pub async fn mark_read(
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<ConversationId>,
    Json(request): Json<MarkReadRequest>,
) -> ApiResult<Json<MarkReadResponse>> {
    let marked = mark_conversation_read(conversation_id, request.reader_id, &state.deps).await?;
    Ok(Json(MarkReadResponse { marked }))
}
