//! Cycle orchestration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use idlewatch_core::config::LifecycleConfig;
use idlewatch_core::error::AppError;
use idlewatch_database::store::{AccountStore, TierQuery};
use idlewatch_entity::lifecycle::{InactivityStats, InactivityTier};
use idlewatch_entity::notification::{AccountRef, NotificationMetadata, NotificationPriority};

use super::classifier::classify;
use super::executor::ActionExecutor;
use super::report::{CycleReport, CycleResult, TierReport};
use crate::mail::InactivityMailer;
use crate::notification::AdminNotifier;

/// The inactivity escalation engine.
///
/// Scheduled and manual triggers share one instance; the internal lock
/// guarantees at most one cycle in flight. A trigger that finds a cycle
/// already running is skipped, not queued.
#[derive(Debug)]
pub struct LifecycleEngine {
    accounts: Arc<dyn AccountStore>,
    executor: ActionExecutor,
    admins: AdminNotifier,
    policy: LifecycleConfig,
    running: Mutex<()>,
}

impl LifecycleEngine {
    /// Creates a new engine.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        mailer: Arc<dyn InactivityMailer>,
        admins: AdminNotifier,
        policy: LifecycleConfig,
    ) -> Self {
        let executor = ActionExecutor::new(
            accounts.clone(),
            mailer,
            Duration::from_secs(policy.send_timeout_seconds),
        );
        Self {
            accounts,
            executor,
            admins,
            policy,
            running: Mutex::new(()),
        }
    }

    /// Thresholds this engine evaluates against.
    pub fn policy(&self) -> &LifecycleConfig {
        &self.policy
    }

    /// Run one cycle against the current time.
    pub async fn run_cycle(&self) -> CycleResult {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle with `now` as the reference time for every tier.
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> CycleResult {
        if !self.policy.enabled {
            info!("Lifecycle engine disabled; skipping cycle");
            return CycleResult::disabled();
        }

        let Ok(_guard) = self.running.try_lock() else {
            warn!("Lifecycle cycle already running; trigger skipped");
            return CycleResult::already_running();
        };

        info!(now = %now, "Lifecycle cycle started");
        let report = self.execute(now, Instant::now()).await;
        info!(
            processed = report.total_processed(),
            failed = report.total_failed(),
            skipped_tiers = report.skipped_tiers().len(),
            duration_ms = report.duration_ms,
            "Lifecycle cycle completed"
        );
        CycleResult::completed(report)
    }

    /// Count accounts per inactivity band.
    pub async fn stats(&self) -> Result<InactivityStats, AppError> {
        self.accounts.inactivity_stats(&self.policy, Utc::now()).await
    }

    /// Every tier runs, in ladder order. A tier whose candidate query fails
    /// is reported as skipped; actions already applied stand.
    async fn execute(&self, now: DateTime<Utc>, started: Instant) -> CycleReport {
        let mut tiers = Vec::with_capacity(InactivityTier::ALL.len());

        for tier in InactivityTier::ALL {
            let candidates = match self
                .accounts
                .find_tier_candidates(TierQuery::for_tier(tier, &self.policy, now))
                .await
            {
                Ok(candidates) => candidates,
                Err(e) => {
                    error!(tier = %tier, error = %e, "Tier candidate query failed; tier skipped");
                    tiers.push(TierReport::skipped(tier));
                    continue;
                }
            };
            let batch: Vec<_> = candidates
                .into_iter()
                .filter(|user| classify(user, &self.policy, now) == Some(tier))
                .collect();

            let outcome = self.executor.run_tier(tier, &batch, now).await;
            let admins_notified = if outcome.succeeded.is_empty() {
                0
            } else {
                self.announce(tier, outcome.succeeded.clone()).await
            };

            info!(
                tier = %tier,
                candidates = batch.len(),
                processed = outcome.succeeded.len(),
                failed = outcome.failed,
                "Tier processed"
            );
            tiers.push(TierReport {
                tier,
                candidates: batch.len(),
                processed: outcome.succeeded.len(),
                failed: outcome.failed,
                admins_notified,
                query_failed: false,
            });
        }

        CycleReport {
            started_at: now,
            duration_ms: started.elapsed().as_millis() as u64,
            tiers,
        }
    }

    /// One operator summary for a tier's batch. Failures here never undo
    /// the actions already applied.
    async fn announce(&self, tier: InactivityTier, accounts: Vec<AccountRef>) -> usize {
        let count = accounts.len();
        let emails: Vec<&str> = accounts.iter().map(|a| a.email.as_str()).collect();
        let title = format!("{count} account(s) {}", tier.summary_verb());
        let message = format!(
            "{count} account(s) {}: {}",
            tier.summary_verb(),
            emails.join(", ")
        );
        let priority = match tier {
            InactivityTier::Days15 | InactivityTier::Days25 => NotificationPriority::Low,
            InactivityTier::DeletionWarning => NotificationPriority::Medium,
            InactivityTier::Days30 | InactivityTier::Days365 => NotificationPriority::High,
        };

        match self
            .admins
            .notify_admins(
                tier.notification_type(),
                priority,
                &title,
                &message,
                Some(NotificationMetadata::lifecycle_batch(tier, accounts)),
            )
            .await
        {
            Ok(report) => report.delivered,
            Err(e) => {
                error!(tier = %tier, error = %e, "Operator fan-out failed");
                0
            }
        }
    }
}
