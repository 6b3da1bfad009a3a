//! User (account) domain entities.

pub mod model;
pub mod role;
pub mod suspension;

pub use model::{CreateUser, User};
pub use role::UserRole;
pub use suspension::SuspensionReason;
