//! # idlewatch-api
//!
//! HTTP API layer for IdleWatch built on Axum.
//!
//! Provides the lifecycle trigger and statistics endpoints, the recipient
//! notification endpoints, the WebSocket upgrade for live deltas, JWT
//! extraction, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
