//! Connection registration and frame routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use idlewatch_core::config::RealtimeConfig;
use idlewatch_entity::user::UserRole;

use crate::message::types::{InboundMessage, OutboundMessage};

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    /// When the user is at the connection limit the oldest one is evicted.
    pub fn register(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(user_id, role, tx));

        let existing = self.pool.get_user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, oldest will be replaced"
            );
            if let Some(oldest) = existing.first() {
                oldest.mark_closed();
                self.pool.remove(&oldest.id);
            }
        }

        self.pool.add(handle.clone());
        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Parses a client frame.
    ///
    /// Pongs are consumed here. Anything needing the notification store is
    /// returned to the caller. Malformed frames get an error frame back.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) -> Option<InboundMessage> {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return None;
        };

        match serde_json::from_str::<InboundMessage>(raw) {
            Ok(InboundMessage::Pong { .. }) => {
                handle.record_pong();
                None
            }
            Ok(msg) => {
                debug!(conn_id = %conn_id, "Inbound client request");
                Some(msg)
            }
            Err(e) => {
                self.send_to_connection(
                    &handle,
                    &OutboundMessage::error("INVALID_MESSAGE", format!("Failed to parse message: {e}")),
                );
                None
            }
        }
    }

    /// Sends a message to every connection of a user. Returns how many
    /// connections accepted it.
    pub fn send_to_user(&self, user_id: &Uuid, message: &OutboundMessage) -> usize {
        let connections = self.pool.get_user_connections(user_id);
        if connections.is_empty() {
            return 0;
        }
        let Some(frame) = serialize(message) else {
            return 0;
        };
        connections
            .iter()
            .filter(|conn| conn.send(frame.clone()))
            .count()
    }

    /// Sends a message to one connection.
    pub fn send_to_connection(&self, handle: &ConnectionHandle, message: &OutboundMessage) -> bool {
        serialize(message).is_some_and(|frame| handle.send(frame))
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_closed();
            self.pool.remove(&conn.id);
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: &Uuid) -> bool {
        !self.pool.get_user_connections(user_id).is_empty()
    }

    /// Returns the realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

fn serialize(message: &OutboundMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!(error = %e, "Failed to serialize outbound message");
            None
        }
    }
}
