//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::MarkManyReadRequest;
pub use response::{ApiResponse, CountResponse, HealthResponse, ReadStateResponse};
