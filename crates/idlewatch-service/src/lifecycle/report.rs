//! Cycle and tier reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use idlewatch_entity::lifecycle::InactivityTier;

/// What happened to one tier within a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct TierReport {
    /// The tier.
    pub tier: InactivityTier,
    /// Accounts the tier's query returned and the classifier confirmed.
    pub candidates: usize,
    /// Accounts successfully transitioned.
    pub processed: usize,
    /// Accounts whose action failed.
    pub failed: usize,
    /// Operators notified about this batch.
    pub admins_notified: usize,
    /// The candidate query failed, so the tier did nothing this cycle.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub query_failed: bool,
}

impl TierReport {
    /// A tier whose candidate query could not be run.
    pub fn skipped(tier: InactivityTier) -> Self {
        Self {
            tier,
            candidates: 0,
            processed: 0,
            failed: 0,
            admins_notified: 0,
            query_failed: true,
        }
    }
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Reference time every tier was evaluated against.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Per-tier results, in execution order.
    pub tiers: Vec<TierReport>,
}

impl CycleReport {
    /// Accounts transitioned across all tiers.
    pub fn total_processed(&self) -> usize {
        self.tiers.iter().map(|t| t.processed).sum()
    }

    /// Accounts that failed across all tiers.
    pub fn total_failed(&self) -> usize {
        self.tiers.iter().map(|t| t.failed).sum()
    }

    /// Tiers whose candidate query failed.
    pub fn skipped_tiers(&self) -> Vec<InactivityTier> {
        self.tiers
            .iter()
            .filter(|t| t.query_failed)
            .map(|t| t.tier)
            .collect()
    }

    /// Report for a specific tier.
    pub fn tier(&self, tier: InactivityTier) -> Option<&TierReport> {
        self.tiers.iter().find(|t| t.tier == tier)
    }
}

/// Outcome returned by a trigger.
#[derive(Debug, Clone, Serialize)]
pub struct CycleResult {
    /// Whether the cycle ran to completion.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Detailed report when the cycle completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
}

impl CycleResult {
    pub(crate) fn completed(report: CycleReport) -> Self {
        let mut message = format!(
            "Lifecycle cycle completed: {} processed, {} failed in {}ms",
            report.total_processed(),
            report.total_failed(),
            report.duration_ms
        );
        let skipped = report.skipped_tiers();
        if !skipped.is_empty() {
            let names: Vec<String> = skipped.iter().map(ToString::to_string).collect();
            message.push_str(&format!("; tiers skipped: {}", names.join(", ")));
        }
        Self {
            success: true,
            message,
            report: Some(report),
        }
    }

    pub(crate) fn already_running() -> Self {
        Self {
            success: false,
            message: "Lifecycle cycle already running".to_string(),
            report: None,
        }
    }

    pub(crate) fn disabled() -> Self {
        Self {
            success: false,
            message: "Lifecycle engine is disabled".to_string(),
            report: None,
        }
    }
}
