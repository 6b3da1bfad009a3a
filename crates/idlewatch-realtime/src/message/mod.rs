//! WebSocket message frames.

pub mod types;

pub use types::{InboundMessage, OutboundMessage};
