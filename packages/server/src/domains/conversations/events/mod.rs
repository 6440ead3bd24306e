//! Conversation domain events, emitted after commit for best-effort fanout.

use serde::Serialize;

use crate::common::{AssignmentId, ConversationId};
use crate::domains::conversations::models::Message;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    ConversationOpened {
        conversation_id: ConversationId,
        assignment_id: Option<AssignmentId>,
    },
    MessageAppended {
        message: Message,
    },
}

impl ChatEvent {
    /// Stream hub topic, one channel per conversation.
    pub fn topic(&self) -> String {
        let conversation_id = match self {
            ChatEvent::ConversationOpened {
                conversation_id, ..
            } => *conversation_id,
            ChatEvent::MessageAppended { message } => message.conversation_id,
        };
        format!("conversation:{conversation_id}")
    }
}
