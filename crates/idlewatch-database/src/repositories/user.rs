//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use idlewatch_core::config::LifecycleConfig;
use idlewatch_core::error::{AppError, ErrorKind};
use idlewatch_core::result::AppResult;
use idlewatch_entity::lifecycle::{InactivityStats, InactivityTier};
use idlewatch_entity::user::{CreateUser, User};

use crate::store::{AccountStore, TierQuery};

const BASELINE: &str = "COALESCE(last_activity_at, created_at)";

/// PostgreSQL-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select_where(
        &self,
        predicate: &str,
        cutoffs: &[DateTime<Utc>],
        context: &'static str,
    ) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT * FROM users WHERE role <> 'admin' AND {predicate} ORDER BY {BASELINE} ASC"
        );
        let mut query = sqlx::query_as::<_, User>(&sql);
        for cutoff in cutoffs {
            query = query.bind(*cutoff);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, context, e))
    }
}

#[async_trait]
impl AccountStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, display_name, role, is_active, last_activity_at, created_at) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(data.role)
        .bind(data.last_activity_at)
        .bind(data.created_at.unwrap_or(now))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("users_email_key") {
                    return AppError::conflict(format!("Email '{}' is already taken", data.email));
                }
            }
            AppError::with_source(ErrorKind::Database, "Failed to create user", e)
        })
    }

    async fn find_tier_candidates(&self, query: TierQuery) -> AppResult<Vec<User>> {
        match query {
            TierQuery::FirstReminder { inactive_since } => {
                self.select_where(
                    &format!(
                        "is_active AND {BASELINE} <= $1 \
                         AND tier15_sent_at IS NULL AND tier25_sent_at IS NULL AND tier30_sent_at IS NULL"
                    ),
                    &[inactive_since],
                    "Failed to select first reminder candidates",
                )
                .await
            }
            TierQuery::SecondReminder {
                inactive_since,
                previous_sent_before,
            } => {
                self.select_where(
                    &format!(
                        "is_active AND {BASELINE} <= $1 AND tier15_sent_at <= $2 \
                         AND tier25_sent_at IS NULL AND tier30_sent_at IS NULL"
                    ),
                    &[inactive_since, previous_sent_before],
                    "Failed to select second reminder candidates",
                )
                .await
            }
            TierQuery::Deactivation {
                inactive_since,
                previous_sent_before,
                overdue_since,
            } => {
                self.select_where(
                    &format!(
                        "is_active AND {BASELINE} <= $1 \
                         AND (tier25_sent_at <= $2 OR {BASELINE} <= $3) \
                         AND tier30_sent_at IS NULL"
                    ),
                    &[inactive_since, previous_sent_before, overdue_since],
                    "Failed to select deactivation candidates",
                )
                .await
            }
            TierQuery::DeletionWarning {
                suspended_before,
                deletion_cutoff,
            } => {
                self.select_where(
                    "NOT is_active AND suspension_reason = 'inactivity' AND suspended_at <= $1 \
                     AND suspended_at > $2 AND deletion_warning_sent_at IS NULL",
                    &[suspended_before, deletion_cutoff],
                    "Failed to select deletion warning candidates",
                )
                .await
            }
            TierQuery::Deletion { suspended_before } => {
                self.select_where(
                    "NOT is_active AND suspension_reason = 'inactivity' AND suspended_at <= $1",
                    &[suspended_before],
                    "Failed to select deletion candidates",
                )
                .await
            }
        }
    }

    async fn record_marker(
        &self,
        id: Uuid,
        tier: InactivityTier,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let sql = match tier {
            InactivityTier::Days15 => {
                "UPDATE users SET tier15_sent_at = $2 WHERE id = $1 AND tier15_sent_at IS NULL"
            }
            InactivityTier::Days25 => {
                "UPDATE users SET tier25_sent_at = $2 WHERE id = $1 AND tier25_sent_at IS NULL"
            }
            InactivityTier::DeletionWarning => {
                "UPDATE users SET deletion_warning_sent_at = $2 \
                 WHERE id = $1 AND deletion_warning_sent_at IS NULL"
            }
            InactivityTier::Days30 | InactivityTier::Days365 => {
                return Err(AppError::internal(format!(
                    "Tier {tier} has no reminder marker"
                )));
            }
        };

        let result = sqlx::query(sql)
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record marker", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_for_inactivity(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        note: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_active = FALSE, suspended_at = $2, \
             suspension_reason = 'inactivity', suspension_note = $3, tier30_sent_at = $2 \
             WHERE id = $1 AND tier30_sent_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .bind(note)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to deactivate user", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_operator_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE role = 'admin' AND is_active ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find operators", e))
    }

    async fn inactivity_stats(
        &self,
        policy: &LifecycleConfig,
        now: DateTime<Utc>,
    ) -> AppResult<InactivityStats> {
        let sql = format!(
            "SELECT \
               COUNT(*) FILTER (WHERE is_active AND {BASELINE} <= $1 AND {BASELINE} > $2) AS inactive_15_to_24_days, \
               COUNT(*) FILTER (WHERE is_active AND {BASELINE} <= $2 AND {BASELINE} > $3) AS inactive_25_to_29_days, \
               COUNT(*) FILTER (WHERE is_active AND {BASELINE} <= $3) AS inactive_30_plus_days, \
               COUNT(*) FILTER (WHERE NOT is_active AND suspension_reason = 'inactivity') AS deactivated_for_inactivity, \
               COUNT(*) FILTER (WHERE NOT is_active AND suspension_reason = 'inactivity' AND suspended_at <= $4) AS pending_deletion \
             FROM users WHERE role <> 'admin'"
        );
        sqlx::query_as::<_, InactivityStats>(&sql)
            .bind(now - Duration::days(policy.first_reminder_days))
            .bind(now - Duration::days(policy.second_reminder_days))
            .bind(now - Duration::days(policy.deactivation_days))
            .bind(now - Duration::days(policy.deletion_warning_days))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to compute inactivity stats", e)
            })
    }
}
