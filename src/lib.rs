//! # Compensation API
//!
//! Read-only HTTP query service over a salary survey dataset. URL query
//! parameters are translated into filter, sort and projection operations
//! against an in-memory table loaded once at startup.
//!
//! ## Modules
//!
//! - [`dataset`]: Column schema, typed values and the CSV loader
//! - [`query`]: Query-string translation and execution
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compensation_api::dataset::load_csv;
//! use compensation_api::query::QueryEngine;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = load_csv("datasets/salary_survey.csv".as_ref())?;
//!     let engine = QueryEngine::new(Arc::new(table));
//!
//!     let params = vec![
//!         ("salary[gte]".to_string(), "100000".to_string()),
//!         ("sort".to_string(), "salary".to_string()),
//!     ];
//!     let result = engine.execute_params(&params)?;
//!
//!     println!("Found {} matching responses", result.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod query;

// Re-export top-level types for convenience
pub use dataset::{Column, DatasetError, DatasetResult, Table, Value, COLUMNS};

pub use query::{
    Condition, Literal, Operand, Operator, QueryEngine, QueryError, QueryPlan, QueryResult,
    ResultSet,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, DatasetConfig, LoggingConfig, ServerConfig};
