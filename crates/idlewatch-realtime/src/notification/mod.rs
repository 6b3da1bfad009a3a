//! Live delta publishing.

pub mod publisher;

pub use publisher::LivePublisher;
