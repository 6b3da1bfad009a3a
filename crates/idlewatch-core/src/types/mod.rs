//! Core type definitions used across the IdleWatch workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
