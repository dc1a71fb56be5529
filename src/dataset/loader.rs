//! CSV Dataset Loader
//!
//! Reads the survey export, checks it against the column schema and infers a
//! scalar type per column. The `timestamp` column is always coerced to a
//! timestamp so it sorts and compares chronologically.

use super::error::{DatasetError, DatasetResult};
use super::schema::{Column, COLUMNS};
use super::table::Table;
use super::value::{is_missing_marker, parse_timestamp, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Inferred storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
    Timestamp,
}

/// Load the dataset from a CSV file on disk
pub fn load_csv(path: &Path) -> DatasetResult<Table> {
    let file = File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let table = from_reader(file)?;
    tracing::info!(rows = table.len(), path = %path.display(), "Dataset loaded");
    Ok(table)
}

/// Load the dataset from any CSV source with a header row
pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.len() != COLUMNS.len() {
        return Err(DatasetError::ColumnCount {
            expected: COLUMNS.len(),
            found: headers.len(),
        });
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let kinds: Vec<ColumnKind> = Column::all()
        .map(|column| infer_kind(column, &raw_rows))
        .collect();

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (row_idx, raw) in raw_rows.into_iter().enumerate() {
        let mut row = Vec::with_capacity(COLUMNS.len());
        for (cell, kind) in raw.into_iter().zip(&kinds) {
            row.push(convert_cell(cell, *kind, row_idx + 1)?);
        }
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

/// Pick the narrowest type that every non-missing cell of a column fits
fn infer_kind(column: Column, rows: &[Vec<String>]) -> ColumnKind {
    if column == Column::TIMESTAMP {
        return ColumnKind::Timestamp;
    }

    let mut present = rows
        .iter()
        .map(|row| row[column.index()].as_str())
        .filter(|cell| !is_missing_marker(cell))
        .peekable();

    if present.peek().is_none() {
        return ColumnKind::Text;
    }

    let cells: Vec<&str> = present.collect();
    if cells.iter().all(|c| c.trim().parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if cells
        .iter()
        .all(|c| c.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false))
    {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn convert_cell(cell: String, kind: ColumnKind, row: usize) -> DatasetResult<Value> {
    if is_missing_marker(&cell) {
        return Ok(Value::Missing);
    }

    let value = match kind {
        ColumnKind::Text => Value::Text(cell),
        // Inference already checked these parse
        ColumnKind::Integer => cell
            .trim()
            .parse()
            .map(Value::Integer)
            .unwrap_or(Value::Missing),
        ColumnKind::Float => cell
            .trim()
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::Missing),
        ColumnKind::Timestamp => match parse_timestamp(&cell) {
            Some(ts) => Value::Timestamp(ts),
            None => return Err(DatasetError::Timestamp { row, value: cell }),
        },
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{sample_table, SAMPLE_CSV};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn column(name: &str) -> Column {
        Column::from_name(name).unwrap()
    }

    #[test]
    fn test_load_sample() {
        let table = sample_table();

        assert_eq!(table.len(), 4);
        assert_eq!(table.header(Column::TIMESTAMP), "Timestamp");
        assert_eq!(
            table.header(column("salary")),
            "Total Base Salary in 2018 (in USD)"
        );
    }

    #[test]
    fn test_column_type_inference() {
        let table = sample_table();

        assert_eq!(table.value(0, column("salary")), &Value::Integer(120000));
        assert_eq!(table.value(1, column("industry_years")), &Value::Float(2.5));
        assert_eq!(
            table.value(0, column("company_size")),
            &Value::Text("1001-5000".to_string())
        );
        assert!(matches!(
            table.value(0, Column::TIMESTAMP),
            Value::Timestamp(_)
        ));
    }

    #[test]
    fn test_missing_cells() {
        let table = sample_table();

        // Integer column with a blank cell stays integer
        assert_eq!(table.value(1, column("bonus")), &Value::Missing);
        assert_eq!(table.value(0, column("bonus")), &Value::Integer(10000));

        assert_eq!(table.value(3, column("education")), &Value::Missing);
        assert_eq!(table.value(3, column("thoughts")), &Value::Missing);
    }

    #[test]
    fn test_column_count_mismatch() {
        let csv = "Timestamp,Salary\n3/21/2016 12:58:52,100\n";
        let err = from_reader(csv.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::ColumnCount {
                expected: 27,
                found: 2
            }
        ));
    }

    #[test]
    fn test_invalid_timestamp() {
        let csv = SAMPLE_CSV.replacen("3/21/2016 12:54:49", "not a date", 1);
        let err = from_reader(csv.as_bytes()).unwrap_err();

        match err {
            DatasetError::Timestamp { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_csv_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("absent.csv")).unwrap_err();

        assert!(matches!(err, DatasetError::Open { .. }));
    }
}
