use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{ConversationId, EngineResult, MessageId, ProfileId};

/// Kind of message payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    File,
    System,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Text => write!(f, "text"),
            MessageType::Image => write!(f, "image"),
            MessageType::File => write!(f, "file"),
            MessageType::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "file" => Ok(MessageType::File),
            "system" => Ok(MessageType::System),
            _ => Err(anyhow::anyhow!("Invalid message type: {}", s)),
        }
    }
}

/// Message model - SQL persistence layer
///
/// Totally ordered within a conversation by `sequence_number` (assigned under
/// the conversation row lock; creation-time ties break by insertion order).
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: ProfileId,
    pub content: String,
    pub message_type: String, // Maps to MessageType
    pub sequence_number: i32,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Next sequence number for a conversation.
    ///
    /// Callers must hold the conversation row lock.
    pub async fn next_sequence_number(
        conversation_id: ConversationId,
        conn: &mut PgConnection,
    ) -> EngineResult<i32> {
        let (next,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(sequence_number), 0) + 1
             FROM messages
             WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_one(conn)
        .await?;
        Ok(next)
    }

    /// Append a message inside the send transaction
    pub async fn create(
        conversation_id: ConversationId,
        sender_id: ProfileId,
        content: &str,
        message_type: MessageType,
        sequence_number: i32,
        conn: &mut PgConnection,
    ) -> EngineResult<Self> {
        let message = sqlx::query_as::<_, Self>(
            "INSERT INTO messages (id, conversation_id, sender_id, content, message_type, sequence_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(MessageId::new())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(message_type.to_string())
        .bind(sequence_number)
        .fetch_one(conn)
        .await?;
        Ok(message)
    }

    /// Conversation history in append order
    pub async fn list(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> EngineResult<Vec<Self>> {
        let messages = sqlx::query_as::<_, Self>(
            "SELECT * FROM messages
             WHERE conversation_id = $1
             ORDER BY sequence_number ASC",
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }

    /// Mark every unread message from the other participant as read.
    ///
    /// Bulk and idempotent: the read flag only ever transitions false -> true,
    /// and re-invoking affects zero rows.
    pub async fn mark_read(
        conversation_id: ConversationId,
        reader_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = TRUE, read_at = NOW()
             WHERE conversation_id = $1
               AND sender_id <> $2
               AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Unread messages addressed to this reader
    pub async fn unread_count(
        conversation_id: ConversationId,
        reader_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages
             WHERE conversation_id = $1
               AND sender_id <> $2
               AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_roundtrip() {
        for t in ["text", "image", "file", "system"] {
            assert_eq!(t.parse::<MessageType>().unwrap().to_string(), t);
        }
        assert!("video".parse::<MessageType>().is_err());
    }
}
