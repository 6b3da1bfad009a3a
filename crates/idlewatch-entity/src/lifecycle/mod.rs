//! Inactivity lifecycle value objects.

pub mod stats;
pub mod tier;

pub use stats::InactivityStats;
pub use tier::InactivityTier;
