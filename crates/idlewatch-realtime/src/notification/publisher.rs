//! Live delta publisher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use idlewatch_entity::notification::LiveDelta;
use idlewatch_service::PushTransport;

use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;

/// Pushes notification deltas to a recipient's open WebSocket sessions.
#[derive(Debug, Clone)]
pub struct LivePublisher {
    connections: Arc<ConnectionManager>,
}

impl LivePublisher {
    /// Create a publisher over a connection manager.
    pub fn new(connections: Arc<ConnectionManager>) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl PushTransport for LivePublisher {
    async fn send_to_recipient(&self, recipient_id: Uuid, delta: LiveDelta) {
        let event = delta.name();
        let delivered = self
            .connections
            .send_to_user(&recipient_id, &OutboundMessage::from(delta));
        debug!(
            recipient_id = %recipient_id,
            event,
            delivered,
            "Live delta published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlewatch_core::config::RealtimeConfig;
    use idlewatch_entity::user::UserRole;

    #[tokio::test]
    async fn test_publishes_to_connected_recipient_only() {
        let connections = Arc::new(ConnectionManager::new(RealtimeConfig::default()));
        let publisher = LivePublisher::new(connections.clone());
        let online = Uuid::new_v4();
        let (_conn, mut rx) = connections.register(online, UserRole::Admin);

        publisher
            .send_to_recipient(online, LiveDelta::UnreadCount { count: 4 })
            .await;
        publisher
            .send_to_recipient(Uuid::new_v4(), LiveDelta::UnreadCount { count: 1 })
            .await;

        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["type"], "unread_count");
        assert_eq!(frame["count"], 4);
        assert!(rx.try_recv().is_err());
    }
}
