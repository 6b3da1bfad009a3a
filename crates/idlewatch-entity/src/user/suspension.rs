//! Suspension reason enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an account was deactivated.
///
/// Only accounts suspended for [`SuspensionReason::Inactivity`] move on to
/// the deletion warning and permanent deletion tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "suspension_reason", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SuspensionReason {
    /// Deactivated by the lifecycle engine after the final notice.
    Inactivity,
    /// Deactivated for any other reason (manual, abuse, ...).
    Other,
}

impl SuspensionReason {
    /// Return the reason as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactivity => "inactivity",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SuspensionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
