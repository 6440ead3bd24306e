use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{EngineResult, NotificationId, ProfileId};

/// What produced the notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Assignment,
    Message,
    System,
    Reminder,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Assignment => write!(f, "assignment"),
            NotificationType::Message => write!(f, "message"),
            NotificationType::System => write!(f, "system"),
            NotificationType::Reminder => write!(f, "reminder"),
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "assignment" => Ok(NotificationType::Assignment),
            "message" => Ok(NotificationType::Message),
            "system" => Ok(NotificationType::System),
            "reminder" => Ok(NotificationType::Reminder),
            _ => Err(anyhow::anyhow!("Invalid notification type: {}", s)),
        }
    }
}

/// Notification model - SQL persistence layer
///
/// One-way informational event. The producer never mutates it after creation;
/// only the recipient may mark it read.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: ProfileId,
    pub title: String,
    pub body: String,
    pub notification_type: String, // Maps to NotificationType
    pub is_read: bool,
    pub action_url: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient_id: ProfileId,
    pub title: String,
    pub body: String,
    pub notification_type: NotificationType,
    pub action_url: Option<String>,
}

impl Notification {
    /// Persist a notification
    pub async fn insert(new: &NewNotification, pool: &PgPool) -> EngineResult<Self> {
        let notification = sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, recipient_id, title, body, notification_type, action_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(new.recipient_id)
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.notification_type.to_string())
        .bind(&new.action_url)
        .fetch_one(pool)
        .await?;
        Ok(notification)
    }

    /// All notifications for a recipient, newest first
    pub async fn find_by_recipient(
        recipient_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<Vec<Self>> {
        let notifications = sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications
             WHERE recipient_id = $1
             ORDER BY created_at DESC",
        )
        .bind(recipient_id)
        .fetch_all(pool)
        .await?;
        Ok(notifications)
    }

    /// Unread notifications for a recipient
    pub async fn unread_count(recipient_id: ProfileId, pool: &PgPool) -> EngineResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification read. Recipient-only; the flag only transitions
    /// false -> true.
    pub async fn mark_read(
        id: NotificationId,
        recipient_id: ProfileId,
        pool: &PgPool,
    ) -> EngineResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = TRUE, read_at = NOW()
             WHERE id = $1
               AND recipient_id = $2
               AND is_read = FALSE",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_roundtrip() {
        for t in ["assignment", "message", "system", "reminder"] {
            assert_eq!(t.parse::<NotificationType>().unwrap().to_string(), t);
        }
    }
}
