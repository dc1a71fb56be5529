//! Field Resolver
//!
//! Splits comma-separated lists from the query string. Used with schema
//! validation for `fields` and `sort`, and without it for the operand lists
//! of `in` / `notin` conditions.

use crate::dataset::Column;
use crate::query::error::{QueryError, QueryResult};

/// Split on commas, trim each token and drop repeats.
///
/// Tokens keep the position of their first occurrence.
pub fn word_list(raw: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim) {
        if !words.iter().any(|w| w == token) {
            words.push(token.to_string());
        }
    }
    words
}

/// Resolve a `fields`/`sort` list into schema columns.
///
/// Fails with [`QueryError::UnsupportedColumn`] if any token is not a
/// canonical field name.
pub fn resolve_fields(raw: &str) -> QueryResult<Vec<Column>> {
    word_list(raw)
        .iter()
        .map(|word| Column::from_name(word).ok_or(QueryError::UnsupportedColumn))
        .collect()
}
