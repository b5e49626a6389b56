//! API route handlers
//!
//! - `health`: liveness and Prometheus metrics
//! - `search`: `POST /hybrid-search`

pub mod health;
pub mod search;

use crate::error::ServerError;

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
