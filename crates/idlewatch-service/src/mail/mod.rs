//! Outbound inactivity email.
//!
//! Delivery itself is an external concern; the engine only needs to know
//! whether a send succeeded.

pub mod logger;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::logger::LogMailer;

/// Result of a single send. Expected delivery failures are reported here,
/// never as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailOutcome {
    /// Whether the message was accepted for delivery.
    pub success: bool,
    /// Why it was not, if it was not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MailOutcome {
    /// A successful send.
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed send.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Sender for the four inactivity messages.
#[async_trait]
pub trait InactivityMailer: Send + Sync + Debug {
    /// First reminder.
    async fn send_reminder_15(&self, email: &str, name: Option<&str>) -> MailOutcome;

    /// Second reminder.
    async fn send_reminder_25(&self, email: &str, name: Option<&str>) -> MailOutcome;

    /// Final notice sent alongside deactivation.
    async fn send_deactivation_notice(&self, email: &str, name: Option<&str>) -> MailOutcome;

    /// Warning ahead of permanent deletion.
    async fn send_deletion_warning(&self, email: &str, name: Option<&str>) -> MailOutcome;
}
