//! Response DTOs.

use serde::{Deserialize, Serialize};

use idlewatch_service::notification::ReadStateChange;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Generic count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// The count.
    pub count: i64,
}

/// Result of a read-state or delete mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadStateResponse {
    /// Notifications the request changed.
    pub changed: u64,
    /// Caller's unread count afterwards.
    pub unread_count: i64,
}

impl From<ReadStateChange> for ReadStateResponse {
    fn from(change: ReadStateChange) -> Self {
        Self {
            changed: change.changed,
            unread_count: change.unread_count,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend state.
    pub database: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Distinct users with an open connection.
    pub online_users: usize,
}
