//! Top-level real-time engine.

use std::sync::Arc;

use tracing::info;

use idlewatch_core::config::RealtimeConfig;

use crate::connection::manager::ConnectionManager;
use crate::notification::publisher::LivePublisher;

/// Owns the connection registry and the publisher that writes into it.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Live delta publisher.
    pub publisher: Arc<LivePublisher>,
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let connections = Arc::new(ConnectionManager::new(config));
        let publisher = Arc::new(LivePublisher::new(connections.clone()));
        info!("Real-time engine initialized");
        Self {
            connections,
            publisher,
        }
    }

    /// Close every open connection.
    pub fn shutdown(&self) {
        self.connections.close_all();
        info!("Real-time engine shut down");
    }
}
