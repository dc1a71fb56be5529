//! Query error types
//!
//! Both variants are client input errors: the caller must correct the query
//! string. Any of them aborts the whole request.

use thiserror::Error;

/// Errors that can occur while translating query parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Condition key names a field outside the column schema
    #[error("Unsupported key {0}")]
    UnsupportedKey(String),

    /// A `fields` or `sort` list contains a name outside the column schema
    #[error("Unsupported column in fields")]
    UnsupportedColumn,
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
