//! In-memory account store.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use idlewatch_core::config::LifecycleConfig;
use idlewatch_core::error::AppError;
use idlewatch_core::result::AppResult;
use idlewatch_entity::lifecycle::{InactivityStats, InactivityTier};
use idlewatch_entity::user::{CreateUser, SuspensionReason, User};

use crate::store::{AccountStore, TierQuery};

/// [`AccountStore`] backed by dashmap.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    users: DashMap<Uuid, User>,
    /// Lower-cased email to account id.
    emails: DashMap<String, Uuid>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, e.g. an account imported mid-lifecycle.
    pub fn insert_user(&self, user: User) -> AppResult<User> {
        match self.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Email '{}' is already taken",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            display_name: data.display_name,
            role: data.role,
            is_active: true,
            last_activity_at: data.last_activity_at,
            created_at: data.created_at.unwrap_or_else(Utc::now),
            suspended_at: None,
            suspension_reason: None,
            suspension_note: None,
            tier15_sent_at: None,
            tier25_sent_at: None,
            tier30_sent_at: None,
            deletion_warning_sent_at: None,
        };
        self.insert_user(user)
    }

    async fn find_tier_candidates(&self, query: TierQuery) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(User::inactivity_baseline);
        Ok(users)
    }

    async fn record_marker(
        &self,
        id: Uuid,
        tier: InactivityTier,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(false);
        };
        let marker = match tier {
            InactivityTier::Days15 => &mut user.tier15_sent_at,
            InactivityTier::Days25 => &mut user.tier25_sent_at,
            InactivityTier::DeletionWarning => &mut user.deletion_warning_sent_at,
            InactivityTier::Days30 | InactivityTier::Days365 => {
                return Err(AppError::internal(format!(
                    "Tier {tier} has no reminder marker"
                )));
            }
        };
        if marker.is_some() {
            return Ok(false);
        }
        *marker = Some(at);
        Ok(true)
    }

    async fn deactivate_for_inactivity(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        note: &str,
    ) -> AppResult<bool> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(false);
        };
        if user.tier30_sent_at.is_some() {
            return Ok(false);
        }
        user.is_active = false;
        user.suspended_at = Some(at);
        user.suspension_reason = Some(SuspensionReason::Inactivity);
        user.suspension_note = Some(note.to_string());
        user.tier30_sent_at = Some(at);
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&user.email.to_lowercase());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_operator_ids(&self) -> AppResult<Vec<Uuid>> {
        let mut operators: Vec<(DateTime<Utc>, Uuid)> = self
            .users
            .iter()
            .filter(|entry| entry.is_operator() && entry.is_active)
            .map(|entry| (entry.created_at, entry.id))
            .collect();
        operators.sort();
        Ok(operators.into_iter().map(|(_, id)| id).collect())
    }

    async fn inactivity_stats(
        &self,
        policy: &LifecycleConfig,
        now: DateTime<Utc>,
    ) -> AppResult<InactivityStats> {
        let first = now - Duration::days(policy.first_reminder_days);
        let second = now - Duration::days(policy.second_reminder_days);
        let deactivation = now - Duration::days(policy.deactivation_days);
        let warning = now - Duration::days(policy.deletion_warning_days);

        let mut stats = InactivityStats::default();
        for entry in self.users.iter() {
            let user = entry.value();
            if user.is_operator() {
                continue;
            }
            if user.is_active {
                let baseline = user.inactivity_baseline();
                if baseline <= deactivation {
                    stats.inactive_30_plus_days += 1;
                } else if baseline <= second {
                    stats.inactive_25_to_29_days += 1;
                } else if baseline <= first {
                    stats.inactive_15_to_24_days += 1;
                }
            } else if user.is_suspended_for_inactivity() {
                stats.deactivated_for_inactivity += 1;
                if user.suspended_at.is_some_and(|at| at <= warning) {
                    stats.pending_deletion += 1;
                }
            }
        }
        Ok(stats)
    }
}
