//! Request handlers, grouped by resource.

pub mod health;
pub mod lifecycle;
pub mod notification;
pub mod ws;
