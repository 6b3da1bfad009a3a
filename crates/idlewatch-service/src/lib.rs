//! # idlewatch-service
//!
//! Business logic for IdleWatch: the inactivity escalation engine and the
//! notification service it reports through.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. External collaborators
//! (mail delivery, live push) sit behind the [`InactivityMailer`] and
//! [`PushTransport`] traits.

pub mod context;
pub mod lifecycle;
pub mod mail;
pub mod notification;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use lifecycle::{CycleReport, CycleResult, LifecycleEngine};
pub use mail::{InactivityMailer, LogMailer, MailOutcome};
pub use notification::{AdminNotifier, FanOutReport, NotificationService, PushTransport};
