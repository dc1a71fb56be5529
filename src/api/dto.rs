//! Data Transfer Objects
//!
//! Response types for the API endpoints. Every query endpoint wraps its
//! payload, or its error text, in a single `message` field.

use serde::Serialize;

/// `{"message": ...}` envelope
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: T) -> Self {
        Self { message }
    }
}

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Number of rows loaded at startup
    pub rows: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}
