//! Inbound and outbound WebSocket message type definitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use idlewatch_entity::notification::{LiveDelta, Notification};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Mark a notification as read.
    MarkRead {
        /// Notification ID.
        notification_id: Uuid,
    },
    /// Mark every notification as read.
    MarkAllRead,
    /// Pong response to server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Sent once after the upgrade.
    Connected {
        /// Server-side connection id.
        connection_id: Uuid,
        /// Unread count at connect time.
        unread_count: i64,
    },
    /// A notification was created for the connected user.
    Notification {
        /// The full notification.
        notification: Box<Notification>,
    },
    /// The connected user's unread count changed.
    UnreadCount {
        /// New count.
        count: i64,
    },
    /// Keep-alive.
    Ping {
        /// Server time in milliseconds.
        timestamp: i64,
    },
    /// A client message could not be handled.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl OutboundMessage {
    /// A ping stamped with the current time.
    pub fn ping() -> Self {
        Self::Ping {
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// An error frame.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<LiveDelta> for OutboundMessage {
    fn from(delta: LiveDelta) -> Self {
        match delta {
            LiveDelta::NotificationCreated { notification } => Self::Notification { notification },
            LiveDelta::UnreadCount { count } => Self::UnreadCount { count },
        }
    }
}
