//! Notification domain entities.

pub mod delta;
pub mod kind;
pub mod metadata;
pub mod model;
pub mod priority;

pub use delta::LiveDelta;
pub use kind::NotificationType;
pub use metadata::{AccountRef, NotificationMetadata};
pub use model::{CreateNotification, Notification};
pub use priority::NotificationPriority;
