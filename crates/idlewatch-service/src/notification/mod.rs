//! Notification store & counter, live delta seam, and admin fan-out.

pub mod admin;
pub mod push;
pub mod service;

pub use admin::{AdminNotifier, FanOutReport};
pub use push::PushTransport;
pub use service::{NotificationList, NotificationService, ReadStateChange};
