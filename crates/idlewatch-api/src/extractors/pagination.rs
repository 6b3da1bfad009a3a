//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use idlewatch_core::config::NotificationsConfig;
use idlewatch_core::types::PageRequest;

/// Query parameters for the notification list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default: 1).
    pub page: Option<u64>,
    /// Items per page.
    #[serde(alias = "limit")]
    pub per_page: Option<u64>,
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

impl PaginationParams {
    /// Converts to a `PageRequest` using the configured default and cap.
    pub fn page_request(&self, config: &NotificationsConfig) -> PageRequest {
        let per_page = self
            .per_page
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            page_size: per_page,
        }
    }
}
