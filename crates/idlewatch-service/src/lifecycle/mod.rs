//! Inactivity escalation engine.
//!
//! A cycle walks the tiers in fixed order, classifies the candidates of
//! each tier, applies the tier's action per account, and sends one
//! operator summary per non-empty batch.

pub mod classifier;
pub mod engine;
pub mod executor;
pub mod report;

pub use classifier::classify;
pub use engine::LifecycleEngine;
pub use executor::{ActionExecutor, TierOutcome};
pub use report::{CycleReport, CycleResult, TierReport};
