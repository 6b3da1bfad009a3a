//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled trigger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the escalation cycle.
    #[serde(default = "default_lifecycle_schedule")]
    pub lifecycle_schedule: String,
    /// Six-field cron expression for notification retention.
    #[serde(default = "default_cleanup_schedule")]
    pub notification_cleanup_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lifecycle_schedule: default_lifecycle_schedule(),
            notification_cleanup_schedule: default_cleanup_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lifecycle_schedule() -> String {
    "0 0 2 * * *".to_string()
}

fn default_cleanup_schedule() -> String {
    "0 30 3 * * *".to_string()
}
