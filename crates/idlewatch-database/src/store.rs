//! Store traits.
//!
//! The lifecycle engine and the notification service only ever talk to
//! these traits. Every mutating method is atomic with respect to the single
//! row (or recipient) it touches.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use idlewatch_core::config::LifecycleConfig;
use idlewatch_core::result::AppResult;
use idlewatch_core::types::{PageRequest, PageResponse};
use idlewatch_entity::lifecycle::{InactivityStats, InactivityTier};
use idlewatch_entity::notification::{CreateNotification, Notification};
use idlewatch_entity::user::{CreateUser, User};

/// Named candidate queries, one per tier.
///
/// Each variant carries absolute cutoffs so both backends evaluate the same
/// predicate. Operator accounts are excluded by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierQuery {
    /// Active, baseline at or before `inactive_since`, no reminder markers.
    FirstReminder {
        /// Baseline cutoff.
        inactive_since: DateTime<Utc>,
    },
    /// Active, first marker at or before `previous_sent_before`, no later markers.
    SecondReminder {
        /// Baseline cutoff.
        inactive_since: DateTime<Utc>,
        /// Spacing cutoff for the first reminder.
        previous_sent_before: DateTime<Utc>,
    },
    /// Active, not deactivated, and either the second marker is at or before
    /// `previous_sent_before` or the baseline is at or before `overdue_since`.
    Deactivation {
        /// Baseline cutoff.
        inactive_since: DateTime<Utc>,
        /// Spacing cutoff for the second reminder.
        previous_sent_before: DateTime<Utc>,
        /// Baseline cutoff past which undelivered reminders no longer hold
        /// deactivation back.
        overdue_since: DateTime<Utc>,
    },
    /// Suspended for inactivity at or before `suspended_before` but after
    /// `deletion_cutoff`, not yet warned.
    DeletionWarning {
        /// Suspension cutoff.
        suspended_before: DateTime<Utc>,
        /// Accounts suspended at or before this are due for deletion instead.
        deletion_cutoff: DateTime<Utc>,
    },
    /// Suspended for inactivity at or before `suspended_before`.
    Deletion {
        /// Suspension cutoff.
        suspended_before: DateTime<Utc>,
    },
}

impl TierQuery {
    /// Build the candidate query for a tier at `now`.
    pub fn for_tier(tier: InactivityTier, policy: &LifecycleConfig, now: DateTime<Utc>) -> Self {
        let days = |d: i64| now - Duration::days(d);
        match tier {
            InactivityTier::Days15 => Self::FirstReminder {
                inactive_since: days(policy.first_reminder_days),
            },
            InactivityTier::Days25 => Self::SecondReminder {
                inactive_since: days(policy.second_reminder_days),
                previous_sent_before: days(
                    policy.second_reminder_days - policy.first_reminder_days,
                ),
            },
            InactivityTier::Days30 => Self::Deactivation {
                inactive_since: days(policy.deactivation_days),
                previous_sent_before: days(
                    policy.deactivation_days - policy.second_reminder_days,
                ),
                overdue_since: days(policy.overdue_deactivation_days()),
            },
            InactivityTier::DeletionWarning => Self::DeletionWarning {
                suspended_before: days(policy.deletion_warning_days),
                deletion_cutoff: days(policy.deletion_days),
            },
            InactivityTier::Days365 => Self::Deletion {
                suspended_before: days(policy.deletion_days),
            },
        }
    }

    /// The tier this query selects candidates for.
    pub fn tier(&self) -> InactivityTier {
        match self {
            Self::FirstReminder { .. } => InactivityTier::Days15,
            Self::SecondReminder { .. } => InactivityTier::Days25,
            Self::Deactivation { .. } => InactivityTier::Days30,
            Self::DeletionWarning { .. } => InactivityTier::DeletionWarning,
            Self::Deletion { .. } => InactivityTier::Days365,
        }
    }

    /// Evaluate the predicate against a single account.
    ///
    /// The in-memory store filters with this; the PostgreSQL store expresses
    /// the same predicate in SQL.
    pub fn matches(&self, user: &User) -> bool {
        if user.is_operator() {
            return false;
        }
        let baseline = user.inactivity_baseline();
        let sent_before = |marker: Option<DateTime<Utc>>, cutoff: DateTime<Utc>| {
            marker.is_some_and(|at| at <= cutoff)
        };
        match *self {
            Self::FirstReminder { inactive_since } => {
                user.is_active
                    && baseline <= inactive_since
                    && user.tier15_sent_at.is_none()
                    && user.tier25_sent_at.is_none()
                    && user.tier30_sent_at.is_none()
            }
            Self::SecondReminder {
                inactive_since,
                previous_sent_before,
            } => {
                user.is_active
                    && baseline <= inactive_since
                    && sent_before(user.tier15_sent_at, previous_sent_before)
                    && user.tier25_sent_at.is_none()
                    && user.tier30_sent_at.is_none()
            }
            Self::Deactivation {
                inactive_since,
                previous_sent_before,
                overdue_since,
            } => {
                user.is_active
                    && baseline <= inactive_since
                    && (sent_before(user.tier25_sent_at, previous_sent_before)
                        || baseline <= overdue_since)
                    && user.tier30_sent_at.is_none()
            }
            Self::DeletionWarning {
                suspended_before,
                deletion_cutoff,
            } => {
                user.is_suspended_for_inactivity()
                    && sent_before(user.suspended_at, suspended_before)
                    && !sent_before(user.suspended_at, deletion_cutoff)
                    && user.deletion_warning_sent_at.is_none()
            }
            Self::Deletion { suspended_before } => {
                user.is_suspended_for_inactivity() && sent_before(user.suspended_at, suspended_before)
            }
        }
    }
}

/// Result of marking a single notification read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// The notification flipped from unread to read.
    Marked,
    /// The notification was already read; nothing changed.
    AlreadyRead,
    /// No such notification for this recipient.
    NotFound,
}

/// Account records as seen by the lifecycle engine.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug {
    /// Find an account by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create an account. Duplicate emails are a `Conflict`.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Select the accounts matching a tier's candidate predicate.
    async fn find_tier_candidates(&self, query: TierQuery) -> AppResult<Vec<User>>;

    /// Set a reminder marker (`Days15`, `Days25`, `DeletionWarning`) if it is
    /// still unset. Returns whether the row changed.
    async fn record_marker(
        &self,
        id: Uuid,
        tier: InactivityTier,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Deactivate an account for inactivity and set its final marker.
    /// Returns whether the row changed.
    async fn deactivate_for_inactivity(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        note: &str,
    ) -> AppResult<bool>;

    /// Permanently delete an account. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Ids of every active operator account.
    async fn find_operator_ids(&self) -> AppResult<Vec<Uuid>>;

    /// Count accounts per inactivity band.
    async fn inactivity_stats(
        &self,
        policy: &LifecycleConfig,
        now: DateTime<Utc>,
    ) -> AppResult<InactivityStats>;
}

/// Notification records and the unread predicate.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug {
    /// Insert an unread notification.
    async fn insert(&self, data: CreateNotification) -> AppResult<Notification>;

    /// Page through a recipient's notifications, newest first.
    async fn find_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>>;

    /// Count the recipient's unread notifications.
    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<i64>;

    /// Mark one of the recipient's notifications read.
    async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome>;

    /// Mark several of the recipient's notifications read. Ids the recipient
    /// does not own are ignored. Returns the number that flipped.
    async fn mark_many_read(
        &self,
        ids: &[Uuid],
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Mark all of the recipient's notifications read.
    async fn mark_all_read(&self, recipient_id: Uuid, at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete one of the recipient's notifications.
    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool>;

    /// Delete every notification of the recipient.
    async fn delete_all(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Delete read notifications created before `cutoff`, for all recipients.
    async fn delete_read_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
