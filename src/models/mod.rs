//! Request and Response models for the cache HTTP adapter
//!
//! DTOs used for deserializing query strings and serializing response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::PutParams;
pub use responses::{GetResponse, HealthResponse, StatsResponse, StatusResponse};
