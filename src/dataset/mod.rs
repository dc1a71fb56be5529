//! Survey Dataset
//!
//! The fixed-schema table served by the API:
//!
//! - **Schema**: canonical column names and the [`Column`] handle
//! - **Value**: typed scalar cells
//! - **Table**: the immutable in-memory row table
//! - **Loader**: CSV import with per-column type inference

mod error;
mod loader;
mod schema;
mod table;
mod value;

pub use error::{DatasetError, DatasetResult};
pub use loader::{from_reader, load_csv};
pub use schema::{Column, COLUMNS};
pub use table::Table;
pub use value::{is_missing_marker, parse_timestamp, Value, TIMESTAMP_FORMAT};
