//! Live delta transport seam.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use idlewatch_entity::notification::LiveDelta;

/// Fire-and-forget delivery of a delta to a recipient's open sessions.
///
/// Implementations must drop the event silently when the recipient has no
/// connected session, and must never fail the caller.
#[async_trait]
pub trait PushTransport: Send + Sync + Debug {
    /// Deliver `delta` to every connected session of `recipient_id`.
    async fn send_to_recipient(&self, recipient_id: Uuid, delta: LiveDelta);
}
