//! Query Translation
//!
//! Maps the query-string grammar of `/compensation_data` onto filter, sort
//! and projection over the loaded table:
//!
//! - **Fields**: comma-separated list resolution and validation
//! - **Condition**: `<field>[<op>]=<value>` parsing into structured predicates
//! - **Engine**: per-request orchestration and result rows
//!
//! # Query String
//!
//! ```text
//! ?salary[gte]=100000&city[in]=Seattle,Austin&sort=salary&fields=city,salary
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use compensation_api::query::QueryEngine;
//!
//! let engine = QueryEngine::new(table);
//! let params = vec![("salary[gte]".to_string(), "100000".to_string())];
//! let result = engine.execute_params(&params)?;
//! println!("{} rows", result.len());
//! ```

mod condition;
mod engine;
mod error;
mod fields;

pub use condition::{parse_condition, Condition, Literal, Operand, Operator};
pub use engine::{QueryEngine, QueryPlan, ResultSet, FIELDS_PARAM, SORT_PARAM};
pub use error::{QueryError, QueryResult};
pub use fields::{resolve_fields, word_list};
