//! Operator fan-out.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use idlewatch_core::error::AppError;
use idlewatch_database::store::AccountStore;
use idlewatch_entity::notification::{
    CreateNotification, NotificationMetadata, NotificationPriority, NotificationType,
};

use super::service::NotificationService;

/// How many operators a fan-out reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FanOutReport {
    /// Operators a notification was created for.
    pub delivered: usize,
    /// Operators whose notification could not be created.
    pub failed: usize,
}

/// Delivers one logical event to every operator account.
#[derive(Debug, Clone)]
pub struct AdminNotifier {
    accounts: Arc<dyn AccountStore>,
    notifications: NotificationService,
}

impl AdminNotifier {
    /// Creates a new admin notifier.
    pub fn new(accounts: Arc<dyn AccountStore>, notifications: NotificationService) -> Self {
        Self {
            accounts,
            notifications,
        }
    }

    /// Creates one notification per current operator.
    ///
    /// No operators is a logged no-op. A failure for one operator does not
    /// stop delivery to the rest; only the operator lookup itself can fail.
    pub async fn notify_admins(
        &self,
        notification_type: NotificationType,
        priority: NotificationPriority,
        title: &str,
        message: &str,
        metadata: Option<NotificationMetadata>,
    ) -> Result<FanOutReport, AppError> {
        let operators = self.accounts.find_operator_ids().await?;
        if operators.is_empty() {
            warn!(kind = %notification_type, "No operator accounts to notify");
            return Ok(FanOutReport::default());
        }

        let mut report = FanOutReport::default();
        for recipient_id in operators {
            let data = CreateNotification {
                recipient_id,
                notification_type,
                title: title.to_string(),
                message: message.to_string(),
                priority,
                metadata: metadata.clone(),
                action_url: Some("/admin/users".to_string()),
            };
            match self.notifications.create(data).await {
                Ok(_) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        recipient_id = %recipient_id,
                        kind = %notification_type,
                        error = %e,
                        "Failed to notify operator"
                    );
                }
            }
        }

        info!(
            kind = %notification_type,
            delivered = report.delivered,
            failed = report.failed,
            "Operator fan-out complete"
        );
        Ok(report)
    }
}
