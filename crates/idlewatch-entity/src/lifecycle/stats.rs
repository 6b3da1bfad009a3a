//! Inactivity band counts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Snapshot of how many accounts sit in each inactivity band.
///
/// Operator accounts are never counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InactivityStats {
    /// Active accounts inactive for at least the first reminder threshold
    /// but less than the second.
    pub inactive_15_to_24_days: i64,
    /// Active accounts between the second reminder and deactivation thresholds.
    pub inactive_25_to_29_days: i64,
    /// Active accounts at or past the deactivation threshold.
    pub inactive_30_plus_days: i64,
    /// Accounts deactivated for inactivity.
    pub deactivated_for_inactivity: i64,
    /// Deactivated accounts inside the deletion warning window.
    pub pending_deletion: i64,
}
