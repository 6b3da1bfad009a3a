//! Structured notification metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::InactivityTier;

/// Identity of an account mentioned in a lifecycle summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account id.
    pub id: Uuid,
    /// Account email at the time of the action.
    pub email: String,
}

/// Typed metadata attached to a notification.
///
/// Known producers get their own variant; anything else travels as an open
/// JSON object under [`NotificationMetadata::Custom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationMetadata {
    /// Summary of one tier's batch in one lifecycle cycle.
    LifecycleBatch {
        /// Tier that was executed.
        tier: InactivityTier,
        /// Number of accounts affected.
        count: usize,
        /// The affected accounts.
        accounts: Vec<AccountRef>,
    },
    /// Free-form structured context.
    Custom {
        /// Arbitrary key/value data.
        data: serde_json::Map<String, serde_json::Value>,
    },
}

impl NotificationMetadata {
    /// Build a batch summary for a tier.
    pub fn lifecycle_batch(tier: InactivityTier, accounts: Vec<AccountRef>) -> Self {
        Self::LifecycleBatch {
            tier,
            count: accounts.len(),
            accounts,
        }
    }

    /// Affected accounts, if this is a lifecycle summary.
    pub fn accounts(&self) -> Option<&[AccountRef]> {
        match self {
            Self::LifecycleBatch { accounts, .. } => Some(accounts),
            Self::Custom { .. } => None,
        }
    }
}
