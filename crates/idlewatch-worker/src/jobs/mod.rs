//! Built-in scheduled jobs.

pub mod lifecycle;
pub mod retention;

pub use lifecycle::LifecycleJobHandler;
pub use retention::RetentionJobHandler;

/// Job name for the inactivity escalation cycle.
pub const LIFECYCLE_JOB: &str = "inactivity_lifecycle";
/// Job name for the read-notification retention sweep.
pub const RETENTION_JOB: &str = "notification_retention";
