//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use idlewatch_core::error::{AppError, ErrorKind};

/// Apply the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying account and notification schema migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Schema is up to date");
    Ok(())
}
