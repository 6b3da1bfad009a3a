//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `PUT /api/notifications/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkManyReadRequest {
    /// Notifications to mark read. Ids the caller does not own are ignored.
    pub ids: Vec<Uuid>,
}
