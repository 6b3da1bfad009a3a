//! Live delta events.

use serde::{Deserialize, Serialize};

use super::model::Notification;

/// A best-effort state change pushed to a recipient's connected sessions.
///
/// Deltas are never the record of a change; the notification store is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LiveDelta {
    /// A notification was created for the recipient.
    NotificationCreated {
        /// The full notification.
        notification: Box<Notification>,
    },
    /// The recipient's unread count changed.
    ///
    /// Each count is read after its own mutation, but concurrent mutations
    /// may deliver their counts out of order. The unread-count endpoint and
    /// the `connected` frame are authoritative.
    UnreadCount {
        /// The freshly computed count.
        count: i64,
    },
}

impl LiveDelta {
    /// Event name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotificationCreated { .. } => "notification_created",
            Self::UnreadCount { .. } => "unread_count",
        }
    }
}
