//! # idlewatch-realtime
//!
//! Live delta publisher for IdleWatch. Provides:
//!
//! - WebSocket connection tracking per recipient
//! - Typed inbound/outbound message frames
//! - A [`PushTransport`](idlewatch_service::PushTransport) implementation
//!   that fans deltas out to every open session of a recipient
//!
//! Nothing here is durable: a delta for a recipient with no open session
//! is dropped, and the notification store remains the source of truth.

pub mod connection;
pub mod message;
pub mod notification;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use notification::publisher::LivePublisher;
pub use server::RealtimeEngine;
