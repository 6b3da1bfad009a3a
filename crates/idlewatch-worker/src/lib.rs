//! Scheduled background jobs for IdleWatch.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to their handlers
//! - A cron scheduler that fires those jobs on their configured schedules
//! - The lifecycle cycle and notification retention jobs

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use scheduler::CronScheduler;
