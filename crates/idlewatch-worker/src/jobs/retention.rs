//! Read-notification retention sweep.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use idlewatch_service::NotificationService;

use super::RETENTION_JOB;
use crate::executor::{JobExecutionError, JobHandler};

/// Deletes read notifications older than the retention window.
/// Unread notifications are never purged.
#[derive(Debug)]
pub struct RetentionJobHandler {
    notifications: NotificationService,
    retention_days: i64,
}

impl RetentionJobHandler {
    /// Create a new retention job handler
    pub fn new(notifications: NotificationService, retention_days: i64) -> Self {
        Self {
            notifications,
            retention_days,
        }
    }
}

#[async_trait]
impl JobHandler for RetentionJobHandler {
    fn job_name(&self) -> &str {
        RETENTION_JOB
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        if self.retention_days <= 0 {
            return Err(JobExecutionError::Permanent(format!(
                "Retention window must be positive, got {} days",
                self.retention_days
            )));
        }

        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let removed = self
            .notifications
            .purge_read_older_than(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Retention sweep failed: {}", e)))?;

        Ok(serde_json::json!({
            "task": RETENTION_JOB,
            "removed": removed,
            "cutoff": cutoff,
        }))
    }
}
