//! Notification type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of notification types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Accounts that received the first inactivity reminder.
    #[serde(rename = "user_inactive_15_days")]
    #[sqlx(rename = "user_inactive_15_days")]
    UserInactive15Days,
    /// Accounts that received the second inactivity reminder.
    #[serde(rename = "user_inactive_25_days")]
    #[sqlx(rename = "user_inactive_25_days")]
    UserInactive25Days,
    /// Accounts deactivated after the final notice.
    #[serde(rename = "user_deactivated_30_days")]
    #[sqlx(rename = "user_deactivated_30_days")]
    UserDeactivated30Days,
    /// Deactivated accounts warned ahead of deletion.
    UserDeletionWarning,
    /// Accounts permanently deleted.
    #[serde(rename = "user_deleted_365_days")]
    #[sqlx(rename = "user_deleted_365_days")]
    UserDeleted365Days,
    /// Operational message from the system itself.
    System,
    /// Anything else.
    General,
}

impl NotificationType {
    /// Return the type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInactive15Days => "user_inactive_15_days",
            Self::UserInactive25Days => "user_inactive_25_days",
            Self::UserDeactivated30Days => "user_deactivated_30_days",
            Self::UserDeletionWarning => "user_deletion_warning",
            Self::UserDeleted365Days => "user_deleted_365_days",
            Self::System => "system",
            Self::General => "general",
        }
    }

    /// Whether the lifecycle engine emits this type.
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, Self::System | Self::General)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let all = [
            NotificationType::UserInactive15Days,
            NotificationType::UserInactive25Days,
            NotificationType::UserDeactivated30Days,
            NotificationType::UserDeletionWarning,
            NotificationType::UserDeleted365Days,
            NotificationType::System,
            NotificationType::General,
        ];
        for kind in all {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_deleted_type_name() {
        let parsed: NotificationType = serde_json::from_str("\"user_deleted_365_days\"").unwrap();
        assert_eq!(parsed, NotificationType::UserDeleted365Days);
        assert!(parsed.is_lifecycle());
        assert!(!NotificationType::General.is_lifecycle());
    }
}
