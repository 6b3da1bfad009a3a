//! Process-local store implementations.
//!
//! Used by the `memory` provider and as the collaborator stand-ins in
//! tests. Each map entry is locked for the duration of a mutation, which
//! gives the same per-row atomicity the PostgreSQL stores provide.

pub mod account;
pub mod notification;

pub use account::MemoryAccountStore;
pub use notification::MemoryNotificationStore;
