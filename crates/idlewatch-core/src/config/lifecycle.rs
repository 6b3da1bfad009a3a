//! Inactivity escalation thresholds.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Day thresholds and per-item limits for the escalation engine.
///
/// Reminder thresholds are measured from the inactivity baseline
/// (last activity, else sign-up). The deletion thresholds are measured from
/// the moment the account was deactivated for inactivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Whether scheduled cycles do anything at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Days of inactivity before the first reminder.
    #[serde(default = "default_first_reminder")]
    pub first_reminder_days: i64,
    /// Days of inactivity before the second reminder.
    #[serde(default = "default_second_reminder")]
    pub second_reminder_days: i64,
    /// Days of inactivity before the final notice and deactivation.
    #[serde(default = "default_deactivation")]
    pub deactivation_days: i64,
    /// Days after deactivation before the deletion warning.
    #[serde(default = "default_deletion_warning")]
    pub deletion_warning_days: i64,
    /// Days after deactivation before permanent deletion.
    #[serde(default = "default_deletion")]
    pub deletion_days: i64,
    /// Upper bound on a single outbound email call, in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_seconds: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_reminder_days: default_first_reminder(),
            second_reminder_days: default_second_reminder(),
            deactivation_days: default_deactivation(),
            deletion_warning_days: default_deletion_warning(),
            deletion_days: default_deletion(),
            send_timeout_seconds: default_send_timeout(),
        }
    }
}

impl LifecycleConfig {
    /// Days of inactivity after which an account is deactivated even if its
    /// reminders never got through: the deactivation threshold plus the
    /// length of the reminder ladder.
    pub fn overdue_deactivation_days(&self) -> i64 {
        self.deactivation_days + (self.deactivation_days - self.first_reminder_days)
    }

    /// Thresholds must be positive and strictly increasing per ladder.
    pub fn validate(&self) -> Result<(), AppError> {
        let reminders = self.first_reminder_days > 0
            && self.first_reminder_days < self.second_reminder_days
            && self.second_reminder_days < self.deactivation_days;
        if !reminders {
            return Err(AppError::configuration(format!(
                "lifecycle reminder thresholds must satisfy 0 < {} < {} < {}",
                self.first_reminder_days, self.second_reminder_days, self.deactivation_days
            )));
        }
        if !(0 < self.deletion_warning_days && self.deletion_warning_days < self.deletion_days) {
            return Err(AppError::configuration(format!(
                "lifecycle deletion thresholds must satisfy 0 < {} < {}",
                self.deletion_warning_days, self.deletion_days
            )));
        }
        if self.send_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "lifecycle.send_timeout_seconds must be positive",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_first_reminder() -> i64 {
    15
}

fn default_second_reminder() -> i64 {
    25
}

fn default_deactivation() -> i64 {
    30
}

fn default_deletion_warning() -> i64 {
    335
}

fn default_deletion() -> i64 {
    365
}

fn default_send_timeout() -> u64 {
    20
}
