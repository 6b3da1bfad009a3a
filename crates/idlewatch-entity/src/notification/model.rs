//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::kind::NotificationType;
use super::metadata::NotificationMetadata;
use super::priority::NotificationPriority;

/// A notification delivered to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient account.
    pub recipient_id: Uuid,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Structured context (JSONB).
    pub metadata: Option<Json<NotificationMetadata>>,
    /// Where a client should navigate on click.
    pub action_url: Option<String>,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification has not been read.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Borrow the typed metadata, if any.
    pub fn metadata(&self) -> Option<&NotificationMetadata> {
        self.metadata.as_ref().map(|json| &json.0)
    }

    /// Materialize an unread notification from creation data.
    pub fn from_create(data: CreateNotification, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id: data.recipient_id,
            notification_type: data.notification_type,
            title: data.title,
            message: data.message,
            priority: data.priority,
            metadata: data.metadata.map(Json),
            action_url: data.action_url,
            is_read: false,
            read_at: None,
            created_at: now,
        }
    }
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Recipient account.
    pub recipient_id: Uuid,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Priority.
    #[serde(default)]
    pub priority: NotificationPriority,
    /// Optional structured context.
    pub metadata: Option<NotificationMetadata>,
    /// Optional navigation target.
    pub action_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_create_is_unread() {
        let now = Utc::now();
        let n = Notification::from_create(
            CreateNotification {
                recipient_id: Uuid::new_v4(),
                notification_type: NotificationType::General,
                title: "Hello".into(),
                message: "World".into(),
                priority: NotificationPriority::Low,
                metadata: None,
                action_url: None,
            },
            now,
        );
        assert!(n.is_unread());
        assert!(n.read_at.is_none());
        assert_eq!(n.created_at, now);
        assert!(n.metadata().is_none());
    }

    #[test]
    fn test_metadata_serializes_inline() {
        let mut data = serde_json::Map::new();
        data.insert("source".into(), "ops".into());
        let n = Notification::from_create(
            CreateNotification {
                recipient_id: Uuid::new_v4(),
                notification_type: NotificationType::System,
                title: "t".into(),
                message: "m".into(),
                priority: NotificationPriority::High,
                metadata: Some(NotificationMetadata::Custom { data }),
                action_url: Some("/admin".into()),
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["metadata"]["kind"], "custom");
        assert_eq!(json["metadata"]["data"]["source"], "ops");
        assert_eq!(json["priority"], "high");
    }
}
