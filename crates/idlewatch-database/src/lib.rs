//! # idlewatch-database
//!
//! Store traits consumed by the lifecycle engine and notification service,
//! with a PostgreSQL implementation (sqlx) and a process-local in-memory
//! implementation (dashmap). [`Stores::connect`] picks one according to
//! `database.provider`.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use provider::Stores;
pub use store::{AccountStore, MarkReadOutcome, NotificationStore, TierQuery};
