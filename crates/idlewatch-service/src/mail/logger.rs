//! Mailer that records sends in the log.

use async_trait::async_trait;
use tracing::info;

use super::{InactivityMailer, MailOutcome};

/// [`InactivityMailer`] that only emits a structured log line per message.
///
/// Stands in for a real delivery service in development and in
/// deployments where another system owns email.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Create a new log mailer.
    pub fn new() -> Self {
        Self
    }

    fn deliver(template: &'static str, email: &str, name: Option<&str>) -> MailOutcome {
        info!(
            template,
            email,
            name = name.unwrap_or("-"),
            "Inactivity email dispatched"
        );
        MailOutcome::sent()
    }
}

#[async_trait]
impl InactivityMailer for LogMailer {
    async fn send_reminder_15(&self, email: &str, name: Option<&str>) -> MailOutcome {
        Self::deliver("inactivity_reminder_15_days", email, name)
    }

    async fn send_reminder_25(&self, email: &str, name: Option<&str>) -> MailOutcome {
        Self::deliver("inactivity_reminder_25_days", email, name)
    }

    async fn send_deactivation_notice(&self, email: &str, name: Option<&str>) -> MailOutcome {
        Self::deliver("inactivity_deactivation_notice", email, name)
    }

    async fn send_deletion_warning(&self, email: &str, name: Option<&str>) -> MailOutcome {
        Self::deliver("inactivity_deletion_warning", email, name)
    }
}
