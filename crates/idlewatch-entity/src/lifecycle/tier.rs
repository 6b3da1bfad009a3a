//! Inactivity tier enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::notification::NotificationType;

/// A named inactivity threshold with one associated action.
///
/// Variants are declared in execution order; a cycle walks
/// [`InactivityTier::ALL`] front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InactivityTier {
    /// First reminder.
    #[serde(rename = "days_15")]
    Days15,
    /// Second reminder.
    #[serde(rename = "days_25")]
    Days25,
    /// Final notice and deactivation.
    #[serde(rename = "days_30")]
    Days30,
    /// Warning ahead of permanent deletion.
    DeletionWarning,
    /// Permanent deletion.
    #[serde(rename = "days_365")]
    Days365,
}

impl InactivityTier {
    /// Every tier in execution order.
    pub const ALL: [InactivityTier; 5] = [
        Self::Days15,
        Self::Days25,
        Self::Days30,
        Self::DeletionWarning,
        Self::Days365,
    ];

    /// Return the tier as a stable string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days15 => "days_15",
            Self::Days25 => "days_25",
            Self::Days30 => "days_30",
            Self::DeletionWarning => "deletion_warning",
            Self::Days365 => "days_365",
        }
    }

    /// Reminder tiers only mark an account after a confirmed send.
    pub fn requires_confirmed_send(&self) -> bool {
        matches!(
            self,
            Self::Days15 | Self::Days25 | Self::DeletionWarning
        )
    }

    /// The notification type operators receive for this tier's batch.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::Days15 => NotificationType::UserInactive15Days,
            Self::Days25 => NotificationType::UserInactive25Days,
            Self::Days30 => NotificationType::UserDeactivated30Days,
            Self::DeletionWarning => NotificationType::UserDeletionWarning,
            Self::Days365 => NotificationType::UserDeleted365Days,
        }
    }

    /// Past-tense description used in operator summaries.
    pub fn summary_verb(&self) -> &'static str {
        match self {
            Self::Days15 => "received the 15-day inactivity reminder",
            Self::Days25 => "received the 25-day inactivity reminder",
            Self::Days30 => "were deactivated after 30 days of inactivity",
            Self::DeletionWarning => "were warned of upcoming deletion",
            Self::Days365 => "were permanently deleted after 365 days",
        }
    }
}

impl fmt::Display for InactivityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_order() {
        let mut sorted = InactivityTier::ALL;
        sorted.sort();
        assert_eq!(sorted, InactivityTier::ALL);
        assert_eq!(InactivityTier::ALL[0], InactivityTier::Days15);
        assert_eq!(InactivityTier::ALL[4], InactivityTier::Days365);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for tier in InactivityTier::ALL {
            let json = serde_json::to_value(tier).unwrap();
            assert_eq!(json, serde_json::Value::String(tier.as_str().to_string()));
        }
    }

    #[test]
    fn test_confirmed_send_tiers() {
        assert!(InactivityTier::Days15.requires_confirmed_send());
        assert!(InactivityTier::DeletionWarning.requires_confirmed_send());
        assert!(!InactivityTier::Days30.requires_confirmed_send());
        assert!(!InactivityTier::Days365.requires_confirmed_send());
    }
}
