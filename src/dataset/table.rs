//! Row Table
//!
//! The dataset as held in memory for the lifetime of the process. Built once
//! by the loader and shared read-only between requests.

use super::schema::{Column, COLUMNS};
use super::value::Value;

/// Immutable in-memory table keyed by schema position
#[derive(Debug, Clone)]
pub struct Table {
    /// Header text from the source file, one per schema column
    headers: Vec<String>,
    /// Rows in load order; each row holds one value per schema column
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Assemble a table from already-typed rows.
    ///
    /// Callers guarantee `headers` and every row have `COLUMNS.len()` entries.
    pub(crate) fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert_eq!(headers.len(), COLUMNS.len());
        debug_assert!(rows.iter().all(|r| r.len() == COLUMNS.len()));
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Full row at `index` in load order
    pub fn row(&self, index: usize) -> &[Value] {
        &self.rows[index]
    }

    /// Single cell
    pub fn value(&self, row: usize, column: Column) -> &Value {
        &self.rows[row][column.index()]
    }

    /// Original header text for a column
    pub fn header(&self, column: Column) -> &str {
        &self.headers[column.index()]
    }

    /// Pairs of (canonical name, source header), in schema order
    pub fn column_definitions(&self) -> Vec<(&'static str, &str)> {
        Column::all()
            .map(|column| (column.name(), self.header(column)))
            .collect()
    }
}
