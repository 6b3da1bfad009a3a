//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;
use super::suspension::SuspensionReason;
use crate::lifecycle::InactivityTier;

/// A registered account as seen by the lifecycle engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// User role.
    pub role: UserRole,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Last recorded activity, if the user ever signed in.
    pub last_activity_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was deactivated.
    pub suspended_at: Option<DateTime<Utc>>,
    /// Why the account was deactivated.
    pub suspension_reason: Option<SuspensionReason>,
    /// Free-form note recorded with the deactivation.
    pub suspension_note: Option<String>,
    /// First reminder marker.
    pub tier15_sent_at: Option<DateTime<Utc>>,
    /// Second reminder marker.
    pub tier25_sent_at: Option<DateTime<Utc>>,
    /// Final notice and deactivation marker.
    pub tier30_sent_at: Option<DateTime<Utc>>,
    /// Deletion warning marker.
    pub deletion_warning_sent_at: Option<DateTime<Utc>>,
}

impl User {
    /// The instant inactivity is measured from.
    pub fn inactivity_baseline(&self) -> DateTime<Utc> {
        self.last_activity_at.unwrap_or(self.created_at)
    }

    /// Whole days elapsed since the inactivity baseline.
    pub fn days_inactive(&self, now: DateTime<Utc>) -> i64 {
        (now - self.inactivity_baseline()).num_days()
    }

    /// Check if this account is an operator.
    pub fn is_operator(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if this account was deactivated by the lifecycle engine.
    pub fn is_suspended_for_inactivity(&self) -> bool {
        !self.is_active && self.suspension_reason == Some(SuspensionReason::Inactivity)
    }

    /// Read the idempotency marker for a tier.
    ///
    /// The permanent deletion tier has no marker: the record disappears.
    pub fn marker(&self, tier: InactivityTier) -> Option<DateTime<Utc>> {
        match tier {
            InactivityTier::Days15 => self.tier15_sent_at,
            InactivityTier::Days25 => self.tier25_sent_at,
            InactivityTier::Days30 => self.tier30_sent_at,
            InactivityTier::DeletionWarning => self.deletion_warning_sent_at,
            InactivityTier::Days365 => None,
        }
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address.
    pub email: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Assigned role.
    pub role: UserRole,
    /// Creation time; the store uses "now" when absent.
    pub created_at: Option<DateTime<Utc>>,
    /// Last activity, if any.
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl CreateUser {
    /// A regular account with no recorded activity.
    pub fn user(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            role: UserRole::User,
            created_at: None,
            last_activity_at: None,
        }
    }

    /// An operator account.
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            role: UserRole::Admin,
            ..Self::user(email)
        }
    }
}
