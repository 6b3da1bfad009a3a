//! Dispatches named jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing;

use idlewatch_core::error::AppError;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Name the job is registered and scheduled under
    fn job_name(&self) -> &str;

    /// Run the job once, returning a JSON summary
    async fn execute(&self) -> Result<Value, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure; the next scheduled run will not fare better
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure; the next scheduled run may succeed
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler by name
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by name
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let name = handler.job_name().to_string();
        tracing::info!(job = %name, "Registered job handler");
        self.handlers.insert(name, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job_name: &str) -> Result<Value, JobExecutionError> {
        let handler = self.handlers.get(job_name).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job '{job_name}'"
            ))
        })?;

        tracing::info!(job = %job_name, "Executing job");
        let started = Instant::now();
        let result = handler.execute().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(summary) => {
                tracing::info!(job = %job_name, elapsed_ms, summary = %summary, "Job completed")
            }
            Err(JobExecutionError::Transient(msg)) => {
                tracing::warn!(job = %job_name, elapsed_ms, "Job failed (transient): {}", msg)
            }
            Err(e) => tracing::error!(job = %job_name, elapsed_ms, error = %e, "Job failed"),
        }
        result
    }

    /// Check if a handler is registered for a job
    pub fn has_handler(&self, job_name: &str) -> bool {
        self.handlers.contains_key(job_name)
    }

    /// Get the list of registered job names
    pub fn registered_jobs(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}
