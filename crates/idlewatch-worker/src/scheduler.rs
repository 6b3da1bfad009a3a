//! Cron scheduler for periodic background jobs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use idlewatch_core::config::WorkerConfig;
use idlewatch_core::error::AppError;

use crate::executor::JobExecutor;
use crate::jobs::{LIFECYCLE_JOB, RETENTION_JOB};

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Executor the cron ticks dispatch into
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("jobs", &self.executor.registered_jobs())
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Register the lifecycle and retention schedules from configuration
    pub async fn register_default_tasks(&self, config: &WorkerConfig) -> Result<(), AppError> {
        self.register(LIFECYCLE_JOB, &config.lifecycle_schedule)
            .await?;
        self.register(RETENTION_JOB, &config.notification_cleanup_schedule)
            .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Fire the named job on a six-field cron schedule
    pub async fn register(&self, job_name: &str, schedule: &str) -> Result<(), AppError> {
        if !self.executor.has_handler(job_name) {
            return Err(AppError::configuration(format!(
                "No handler registered for scheduled job '{job_name}'"
            )));
        }

        let executor = Arc::clone(&self.executor);
        let name = job_name.to_string();
        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let name = name.clone();
            Box::pin(async move {
                tracing::debug!(job = %name, "Cron tick");
                // Errors are already logged by the executor.
                let _ = executor.execute(&name).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid schedule '{}' for {}: {}",
                schedule, job_name, e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add {} schedule: {}", job_name, e))
        })?;

        tracing::info!(job = %job_name, schedule = %schedule, "Registered scheduled job");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
