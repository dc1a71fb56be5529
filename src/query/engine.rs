//! Query Engine
//!
//! Translates the parameters of one request into a [`QueryPlan`] and runs it
//! against the shared table. Execution never copies or mutates the table:
//! sorting and projection work on a view made of row indices and a column
//! list, so concurrent requests cannot observe each other.

use crate::dataset::{Column, Table, Value};
use crate::query::condition::{parse_condition, Condition};
use crate::query::error::QueryResult;
use crate::query::fields::resolve_fields;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Instant;

/// Parameter naming the sort keys
pub const SORT_PARAM: &str = "sort";
/// Parameter naming the projected fields
pub const FIELDS_PARAM: &str = "fields";

/// Everything one request asked for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    /// Conditions, all of which must hold
    pub conditions: Vec<Condition>,
    /// Ascending sort keys, most significant first
    pub sort: Option<Vec<Column>>,
    /// Projected columns in output order
    pub fields: Option<Vec<Column>>,
}

impl QueryPlan {
    /// Build a plan from raw query-string pairs.
    ///
    /// A repeated key keeps only its last value. The first invalid
    /// parameter aborts the whole plan.
    pub fn from_params(params: &[(String, String)]) -> QueryResult<Self> {
        let mut plan = QueryPlan::default();

        for (key, value) in collapse_params(params) {
            match key {
                SORT_PARAM => plan.sort = Some(resolve_fields(value)?),
                FIELDS_PARAM => plan.fields = Some(resolve_fields(value)?),
                _ => plan.conditions.push(parse_condition(key, value)?),
            }
        }

        Ok(plan)
    }
}

/// Keep the last value of each key at the position of its first occurrence
fn collapse_params(params: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut collapsed: Vec<(&str, &str)> = Vec::with_capacity(params.len());
    for (key, value) in params {
        match collapsed.iter_mut().find(|(k, _)| *k == key.as_str()) {
            Some(entry) => entry.1 = value.as_str(),
            None => collapsed.push((key.as_str(), value.as_str())),
        }
    }
    collapsed
}

/// Executes query plans against the shared table
pub struct QueryEngine {
    table: Arc<Table>,
}

impl QueryEngine {
    pub fn new(table: Arc<Table>) -> Self {
        Self { table }
    }

    /// The table this engine reads
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Parse request parameters and execute them
    pub fn execute_params(&self, params: &[(String, String)]) -> QueryResult<ResultSet<'_>> {
        let plan = QueryPlan::from_params(params)?;
        Ok(self.execute(&plan))
    }

    /// Execute a plan: sort, then filter, then project.
    pub fn execute(&self, plan: &QueryPlan) -> ResultSet<'_> {
        let start = Instant::now();
        let table = self.table.as_ref();

        let mut rows: Vec<usize> = (0..table.len()).collect();

        if let Some(keys) = &plan.sort {
            // stable: ties keep load order
            rows.sort_by(|&a, &b| {
                keys.iter()
                    .map(|&key| table.value(a, key).sort_cmp(table.value(b, key)))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        if !plan.conditions.is_empty() {
            rows.retain(|&r| {
                let row = table.row(r);
                plan.conditions.iter().all(|c| c.matches(row))
            });
        }

        let columns = plan
            .fields
            .clone()
            .unwrap_or_else(|| Column::all().collect());

        tracing::debug!(
            conditions = plan.conditions.len(),
            sorted = plan.sort.is_some(),
            columns = columns.len(),
            rows = rows.len(),
            total_rows = table.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query executed"
        );

        ResultSet {
            table,
            columns,
            rows,
        }
    }
}

/// Rows surviving a query, borrowed from the shared table.
///
/// Serializes as a JSON array of objects whose keys follow the projected
/// column order.
#[derive(Debug)]
pub struct ResultSet<'a> {
    table: &'a Table,
    columns: Vec<Column>,
    rows: Vec<usize>,
}

impl<'a> ResultSet<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Indices of the result rows in the source table
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Projected cells of the n-th result row
    pub fn row(&self, n: usize) -> Vec<&'a Value> {
        let row = self.rows[n];
        self.columns
            .iter()
            .map(|&c| self.table.value(row, c))
            .collect()
    }
}

impl Serialize for ResultSet<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for &row in &self.rows {
            seq.serialize_element(&RowRef {
                table: self.table,
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct RowRef<'a> {
    table: &'a Table,
    columns: &'a [Column],
    row: usize,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for &column in self.columns {
            map.serialize_entry(column.name(), self.table.value(self.row, column))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_table;
    use crate::dataset::COLUMNS;
    use crate::query::QueryError;

    fn engine() -> QueryEngine {
        QueryEngine::new(Arc::new(sample_table()))
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(engine: &QueryEngine, pairs: &[(&str, &str)]) -> QueryResult<Vec<usize>> {
        engine
            .execute_params(&params(pairs))
            .map(|result| result.row_indices().to_vec())
    }

    #[test]
    fn test_no_params_returns_everything() {
        let engine = engine();
        let result = engine.execute_params(&[]).unwrap();

        assert_eq!(result.row_indices(), &[0, 1, 2, 3]);
        assert_eq!(result.columns().len(), COLUMNS.len());
    }

    #[test]
    fn test_sort_is_stable() {
        let engine = engine();

        // rows 1 and 3 share a salary and keep load order
        assert_eq!(run(&engine, &[("sort", "salary")]).unwrap(), vec![1, 3, 0, 2]);
        assert_eq!(
            run(&engine, &[("sort", "timestamp")]).unwrap(),
            vec![1, 0, 2, 3]
        );
    }

    #[test]
    fn test_multi_key_sort() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("sort", "salary,job_level")]).unwrap(),
            vec![3, 1, 0, 2]
        );
        assert_eq!(
            run(&engine, &[("sort", "company_name, salary")]).unwrap(),
            vec![3, 0, 1, 2]
        );
    }

    #[test]
    fn test_sort_missing_last() {
        let engine = engine();
        assert_eq!(run(&engine, &[("sort", "bonus")]).unwrap(), vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_conditions_are_conjoined() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("city", "Seattle"), ("salary[gt]", "100000")]).unwrap(),
            vec![0]
        );
        assert!(run(&engine, &[("city", "Austin"), ("gender", "Male")])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_filter_after_sort() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("sort", "salary"), ("country", "USA")]).unwrap(),
            vec![1, 3, 0]
        );
    }

    #[test]
    fn test_projection_order() {
        let engine = engine();
        let result = engine
            .execute_params(&params(&[("fields", "salary,city,salary")]))
            .unwrap();

        let names: Vec<&str> = result.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["salary", "city"]);
        assert_eq!(
            result.row(0),
            vec![&Value::Integer(120000), &Value::Text("Seattle".to_string())]
        );
    }

    #[test]
    fn test_filter_on_projected_out_column() {
        let engine = engine();
        let result = engine
            .execute_params(&params(&[("fields", "city"), ("salary[gte]", "150000")]))
            .unwrap();

        assert_eq!(result.row_indices(), &[2]);
        assert_eq!(result.row(0), vec![&Value::Text("Toronto".to_string())]);
    }

    #[test]
    fn test_unsupported_column_aborts() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("fields", "salary,wage")]),
            Err(QueryError::UnsupportedColumn)
        );
        assert_eq!(
            run(&engine, &[("sort", "wage")]),
            Err(QueryError::UnsupportedColumn)
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("wage", "1"), ("fields", "nope")]),
            Err(QueryError::UnsupportedKey("wage".to_string()))
        );
        assert_eq!(
            run(&engine, &[("fields", "nope"), ("wage", "1")]),
            Err(QueryError::UnsupportedColumn)
        );
    }

    #[test]
    fn test_repeated_key_last_value_wins() {
        let engine = engine();

        assert_eq!(
            run(&engine, &[("city", "Austin"), ("city", "Toronto")]).unwrap(),
            vec![2]
        );
        assert_eq!(
            run(&engine, &[("sort", "wage"), ("sort", "salary")]).unwrap(),
            vec![1, 3, 0, 2]
        );
    }

    #[test]
    fn test_plan_from_params() {
        let plan = QueryPlan::from_params(&params(&[
            ("salary[gte]", "100000"),
            ("sort", "timestamp"),
            ("fields", "salary"),
        ]))
        .unwrap();

        assert_eq!(plan.conditions.len(), 1);
        assert_eq!(plan.sort, Some(vec![Column::TIMESTAMP]));
        assert_eq!(plan.fields, Column::from_name("salary").map(|c| vec![c]));
    }

    #[test]
    fn test_serialize_keeps_column_order_and_blanks() {
        let engine = engine();
        let result = engine
            .execute_params(&params(&[
                ("fields", "thoughts,salary,timestamp"),
                ("company_name", "Acme"),
                ("sort", "timestamp"),
            ]))
            .unwrap();

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"thoughts":"Growing","salary":120000,"timestamp":"2016-03-21T12:58:52"},"#,
                r#"{"thoughts":"","salary":95000,"timestamp":"2016-03-23T17:30:00"}]"#
            )
        );
    }

    #[test]
    fn test_every_column_round_trips_as_fields() {
        let engine = engine();
        let all: Vec<&str> = engine
            .table()
            .column_definitions()
            .into_iter()
            .map(|(name, _)| name)
            .collect();

        let joined = all.join(",");
        let result = engine
            .execute_params(&params(&[("fields", joined.as_str())]))
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.columns().len(), COLUMNS.len());
    }
}
