//! Escalation actions.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use idlewatch_core::error::AppError;
use idlewatch_database::store::AccountStore;
use idlewatch_entity::lifecycle::InactivityTier;
use idlewatch_entity::notification::AccountRef;
use idlewatch_entity::user::User;

use crate::mail::{InactivityMailer, MailOutcome};

const DEACTIVATION_NOTE: &str = "Deactivated automatically after 30 days of inactivity";

/// Result of running one tier's action over its batch.
#[derive(Debug, Clone, Default)]
pub struct TierOutcome {
    /// Accounts successfully transitioned.
    pub succeeded: Vec<AccountRef>,
    /// Accounts whose action failed or was not confirmed.
    pub failed: usize,
}

/// Applies tier actions to individual accounts.
///
/// Reminder tiers set their marker only after a confirmed send. The
/// deactivation tier always deactivates, whatever the notice's fate.
/// The deletion tier removes the record outright.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    accounts: Arc<dyn AccountStore>,
    mailer: Arc<dyn InactivityMailer>,
    send_timeout: Duration,
}

impl ActionExecutor {
    /// Creates a new executor.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        mailer: Arc<dyn InactivityMailer>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            accounts,
            mailer,
            send_timeout,
        }
    }

    /// Run `tier` over `batch`, isolating failures per account.
    pub async fn run_tier(
        &self,
        tier: InactivityTier,
        batch: &[User],
        now: DateTime<Utc>,
    ) -> TierOutcome {
        let mut outcome = TierOutcome::default();
        for user in batch {
            match self.apply(tier, user, now).await {
                Ok(true) => outcome.succeeded.push(AccountRef {
                    id: user.id,
                    email: user.email.clone(),
                }),
                Ok(false) => outcome.failed += 1,
                Err(e) => {
                    outcome.failed += 1;
                    error!(
                        user_id = %user.id,
                        tier = %tier,
                        error = %e,
                        "Lifecycle action failed"
                    );
                }
            }
        }
        outcome
    }

    /// Apply `tier` to a single account. `Ok(false)` means the account was
    /// not transitioned and will be retried next cycle.
    pub async fn apply(
        &self,
        tier: InactivityTier,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        match tier {
            InactivityTier::Days15 | InactivityTier::Days25 | InactivityTier::DeletionWarning => {
                let sent = self.send(tier, user).await;
                if !sent.success {
                    warn!(
                        user_id = %user.id,
                        tier = %tier,
                        error = sent.error.as_deref().unwrap_or("unknown"),
                        "Reminder not delivered; marker left unset"
                    );
                    return Ok(false);
                }
                let recorded = self.accounts.record_marker(user.id, tier, now).await?;
                if recorded {
                    info!(user_id = %user.id, tier = %tier, "Reminder sent");
                }
                Ok(recorded)
            }
            InactivityTier::Days30 => {
                let sent = self.send(tier, user).await;
                if !sent.success {
                    warn!(
                        user_id = %user.id,
                        error = sent.error.as_deref().unwrap_or("unknown"),
                        "Deactivation notice not delivered; deactivating anyway"
                    );
                }
                let deactivated = self
                    .accounts
                    .deactivate_for_inactivity(user.id, now, DEACTIVATION_NOTE)
                    .await?;
                if deactivated {
                    info!(user_id = %user.id, "Account deactivated for inactivity");
                }
                Ok(deactivated)
            }
            InactivityTier::Days365 => {
                let deleted = self.accounts.delete(user.id).await?;
                if deleted {
                    info!(user_id = %user.id, "Account permanently deleted");
                }
                Ok(deleted)
            }
        }
    }

    async fn send(&self, tier: InactivityTier, user: &User) -> MailOutcome {
        let email = user.email.as_str();
        let name = user.display_name.as_deref();
        let send = async {
            match tier {
                InactivityTier::Days15 => self.mailer.send_reminder_15(email, name).await,
                InactivityTier::Days25 => self.mailer.send_reminder_25(email, name).await,
                InactivityTier::Days30 => self.mailer.send_deactivation_notice(email, name).await,
                InactivityTier::DeletionWarning => {
                    self.mailer.send_deletion_warning(email, name).await
                }
                InactivityTier::Days365 => MailOutcome::sent(),
            }
        };
        match tokio::time::timeout(self.send_timeout, send).await {
            Ok(outcome) => outcome,
            Err(_) => MailOutcome::failed(format!(
                "send timed out after {}s",
                self.send_timeout.as_secs()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingMailer;
    use chrono::Duration as ChronoDuration;
    use idlewatch_database::memory::MemoryAccountStore;
    use idlewatch_entity::user::{CreateUser, SuspensionReason};

    struct Fixture {
        accounts: Arc<MemoryAccountStore>,
        mailer: Arc<RecordingMailer>,
        executor: ActionExecutor,
    }

    fn fixture() -> Fixture {
        let accounts = Arc::new(MemoryAccountStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let executor =
            ActionExecutor::new(accounts.clone(), mailer.clone(), Duration::from_millis(200));
        Fixture {
            accounts,
            mailer,
            executor,
        }
    }

    async fn idle(f: &Fixture, email: &str, days: i64) -> User {
        f.accounts
            .create(CreateUser {
                created_at: Some(Utc::now() - ChronoDuration::days(days)),
                ..CreateUser::user(email)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_reminder_leaves_marker_unset() {
        let f = fixture();
        let ok = idle(&f, "ok@example.com", 20).await;
        let bad = idle(&f, "bad@example.com", 20).await;
        f.mailer.fail_for("bad@example.com");

        let outcome = f
            .executor
            .run_tier(InactivityTier::Days15, &[ok.clone(), bad.clone()], Utc::now())
            .await;

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(outcome.succeeded[0].id, ok.id);
        assert_eq!(outcome.failed, 1);
        let bad = f.accounts.find_by_id(bad.id).await.unwrap().unwrap();
        assert!(bad.tier15_sent_at.is_none());
        let ok = f.accounts.find_by_id(ok.id).await.unwrap().unwrap();
        assert!(ok.tier15_sent_at.is_some());
    }

    #[tokio::test]
    async fn test_deactivation_ignores_mail_failure() {
        let f = fixture();
        let user = idle(&f, "gone@example.com", 35).await;
        f.mailer.fail_for("gone@example.com");

        let outcome = f
            .executor
            .run_tier(InactivityTier::Days30, std::slice::from_ref(&user), Utc::now())
            .await;

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(f.mailer.sends("deactivation"), vec!["gone@example.com"]);
        let stored = f.accounts.find_by_id(user.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(stored.tier30_sent_at.is_some());
        assert_eq!(stored.suspension_reason, Some(SuspensionReason::Inactivity));
    }

    #[tokio::test]
    async fn test_deletion_removes_record_without_mail() {
        let f = fixture();
        let user = idle(&f, "old@example.com", 500).await;

        let outcome = f
            .executor
            .run_tier(InactivityTier::Days365, std::slice::from_ref(&user), Utc::now())
            .await;

        assert_eq!(outcome.succeeded.len(), 1);
        assert_eq!(f.mailer.total(), 0);
        assert!(f.accounts.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slow_send_times_out_as_failure() {
        let f = fixture();
        let user = idle(&f, "slow@example.com", 20).await;
        f.mailer.stall(Duration::from_secs(5));

        let transitioned = f
            .executor
            .apply(InactivityTier::Days15, &user, Utc::now())
            .await
            .unwrap();

        assert!(!transitioned);
        let stored = f.accounts.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.tier15_sent_at.is_none());
    }

    #[tokio::test]
    async fn test_missing_account_counts_as_failure() {
        let f = fixture();
        let user = idle(&f, "vanished@example.com", 500).await;
        f.accounts.delete(user.id).await.unwrap();

        let outcome = f
            .executor
            .run_tier(InactivityTier::Days365, &[user], Utc::now())
            .await;
        assert!(outcome.succeeded.is_empty());
        assert_eq!(outcome.failed, 1);
    }
}
