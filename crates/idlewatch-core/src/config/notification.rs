//! Notification listing and retention configuration.

use serde::{Deserialize, Serialize};

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Page size used when a listing request omits one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Largest page size a listing request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Number of days a *read* notification is kept before the retention job
    /// removes it. Unread notifications are never purged.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_max_page_size() -> u64 {
    100
}

fn default_retention_days() -> i64 {
    90
}
