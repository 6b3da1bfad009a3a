//! Scheduled inactivity escalation cycle.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use idlewatch_core::error::AppError;
use idlewatch_service::LifecycleEngine;

use super::LIFECYCLE_JOB;
use crate::executor::{JobExecutionError, JobHandler};

/// Runs one lifecycle cycle per tick.
///
/// Shares the engine with the manual trigger, so a tick that lands while a
/// manual cycle is running is skipped by the engine itself.
#[derive(Debug)]
pub struct LifecycleJobHandler {
    engine: Arc<LifecycleEngine>,
}

impl LifecycleJobHandler {
    /// Create a new lifecycle job handler
    pub fn new(engine: Arc<LifecycleEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobHandler for LifecycleJobHandler {
    fn job_name(&self) -> &str {
        LIFECYCLE_JOB
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let result = self.engine.run_cycle().await;
        if !result.success {
            tracing::warn!(message = %result.message, "Scheduled lifecycle cycle did not complete");
        }
        Ok(serde_json::to_value(&result).map_err(AppError::from)?)
    }
}
