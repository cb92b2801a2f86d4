//! API Module
//!
//! HTTP adapter exposing the cache façade.
//!
//! # Endpoints
//! - `GET /cache/:key` - Retrieve a value by key
//! - `POST /cache/:key?value=&ttl=` - Store a value
//! - `DELETE /cache/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
