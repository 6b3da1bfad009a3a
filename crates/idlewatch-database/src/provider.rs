//! Store provider selection.

use std::sync::Arc;

use tracing::info;

use idlewatch_core::config::{DatabaseConfig, DatabaseProvider};
use idlewatch_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryAccountStore, MemoryNotificationStore};
use crate::migration::run_migrations;
use crate::repositories::{NotificationRepository, UserRepository};
use crate::store::{AccountStore, NotificationStore};

/// The pair of stores the rest of the application runs on.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Account records.
    pub accounts: Arc<dyn AccountStore>,
    /// Notification records.
    pub notifications: Arc<dyn NotificationStore>,
    /// The PostgreSQL pool, when that provider is in use.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores selected by `database.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory stores; data will not survive a restart");
                Ok(Self::memory())
            }
        }
    }

    /// Stores backed by an open PostgreSQL pool.
    pub fn postgres(db: DatabasePool) -> Self {
        Self {
            accounts: Arc::new(UserRepository::new(db.pool().clone())),
            notifications: Arc::new(NotificationRepository::new(db.pool().clone())),
            pool: Some(db),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        Self::from_memory(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryNotificationStore::new()),
        )
    }

    /// Wrap existing in-memory stores, keeping concrete handles for seeding.
    pub fn from_memory(
        accounts: Arc<MemoryAccountStore>,
        notifications: Arc<MemoryNotificationStore>,
    ) -> Self {
        Self {
            accounts,
            notifications,
            pool: None,
        }
    }

    /// Check that the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<()> {
        match &self.pool {
            Some(db) => db.health_check().await,
            None => Ok(()),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let config = DatabaseConfig::default();
        let stores = Stores::connect(&config).await.unwrap();
        assert!(stores.pool.is_none());
        assert!(stores.health_check().await.is_ok());
        assert!(stores.accounts.find_operator_ids().await.unwrap().is_empty());
    }
}
