//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::dataset::Table;
use crate::query::QueryEngine;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Query engine over the read-only survey table
    pub engine: Arc<QueryEngine>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }

    /// Create state directly from a loaded table
    pub fn from_table(table: Table) -> Self {
        Self::new(Arc::new(QueryEngine::new(Arc::new(table))))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
