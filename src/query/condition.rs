//! Condition Parser
//!
//! Turns one query parameter such as `salary[gte]=100000` into a structured
//! [`Condition`] that is evaluated directly against table rows.
//!
//! # Key grammar
//!
//! ```text
//! <field>[<op>]=<value>    op: gte | lte | gt | lt | ne | in | notin
//! <field>=<value>          equality
//! ```
//!
//! A key whose bracket suffix is missing or unrecognized is taken whole as
//! the field name.

use crate::dataset::{parse_timestamp, Column, Value};
use crate::query::error::{QueryError, QueryResult};
use crate::query::fields::word_list;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.+)\[(gte|lte|gt|lt|in|ne|notin)\]")
            .expect("condition key pattern is valid")
    })
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal to (no suffix)
    Eq,
    /// `[ne]`
    Ne,
    /// `[gt]`
    Gt,
    /// `[gte]`
    Gte,
    /// `[lt]`
    Lt,
    /// `[lte]`
    Lte,
    /// `[in]`
    In,
    /// `[notin]`
    NotIn,
}

impl Operator {
    /// Parse a bracket suffix
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "gte" => Some(Self::Gte),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "lt" => Some(Self::Lt),
            "ne" => Some(Self::Ne),
            "in" => Some(Self::In),
            "notin" => Some(Self::NotIn),
            _ => None,
        }
    }

    /// Whether the operand is a comma-separated set rather than a scalar
    pub fn takes_set(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Apply a scalar operator to the outcome of comparing cell and literal.
    ///
    /// `None` means the two were incomparable; only `!=` holds then.
    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Self::Ne, ord) => ord != Some(Ordering::Equal),
            (_, None) => false,
            (Self::Eq, Some(ord)) => ord == Ordering::Equal,
            (Self::Gt, Some(ord)) => ord == Ordering::Greater,
            (Self::Gte, Some(ord)) => ord != Ordering::Less,
            (Self::Lt, Some(ord)) => ord == Ordering::Less,
            (Self::Lte, Some(ord)) => ord != Ordering::Greater,
            (Self::In | Self::NotIn, Some(_)) => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
            Self::In => write!(f, "in"),
            Self::NotIn => write!(f, "not in"),
        }
    }
}

/// A literal taken from the query string
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Text made only of ASCII digits
    Number(f64),
    /// Anything else, compared as a string
    Text(String),
}

impl Literal {
    /// Decide between numeric and string literal.
    ///
    /// Only an all-digit value is numeric: no sign, decimal point or exponent.
    pub fn infer(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<f64>() {
                return Literal::Number(n);
            }
        }
        Literal::Text(raw.to_string())
    }

    /// Compare a cell against this literal
    fn compare(&self, cell: &Value) -> Option<Ordering> {
        match (cell, self) {
            (Value::Integer(_) | Value::Float(_), Literal::Number(n)) => {
                cell.as_f64().and_then(|v| v.partial_cmp(n))
            }
            (Value::Text(s), Literal::Text(t)) => Some(s.as_str().cmp(t.as_str())),
            (Value::Timestamp(ts), Literal::Text(t)) => {
                parse_timestamp(t).map(|lit| ts.cmp(&lit))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Literal),
    Set(Vec<Literal>),
}

/// One predicate over one field
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field the predicate reads
    pub column: Column,
    /// Comparison operator
    pub op: Operator,
    /// Value or set to compare against
    pub operand: Operand,
}

impl Condition {
    /// Evaluate against a full table row
    pub fn matches(&self, row: &[Value]) -> bool {
        let cell = &row[self.column.index()];

        match (&self.operand, self.op) {
            (Operand::Set(members), Operator::NotIn) => !is_member(cell, members),
            (Operand::Set(members), _) => is_member(cell, members),
            (Operand::Scalar(literal), op) => op.holds(literal.compare(cell)),
        }
    }
}

fn is_member(cell: &Value, members: &[Literal]) -> bool {
    members
        .iter()
        .any(|m| m.compare(cell) == Some(Ordering::Equal))
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::Scalar(literal) => write!(f, "{} {} {}", self.column, self.op, literal),
            Operand::Set(members) => {
                let list: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{} {} [{}]", self.column, self.op, list.join(", "))
            }
        }
    }
}

/// Parse one `key=value` query parameter into a condition
pub fn parse_condition(key: &str, value: &str) -> QueryResult<Condition> {
    let (field, op) = match key_pattern().captures(key) {
        Some(caps) => {
            let op = Operator::from_suffix(&caps[2]).unwrap_or(Operator::Eq);
            (caps.get(1).map_or(key, |m| m.as_str()), op)
        }
        None => (key, Operator::Eq),
    };

    let column =
        Column::from_name(field).ok_or_else(|| QueryError::UnsupportedKey(field.to_string()))?;

    let operand = if op.takes_set() {
        Operand::Set(word_list(value).iter().map(|w| Literal::infer(w)).collect())
    } else {
        Operand::Scalar(Literal::infer(value))
    };

    Ok(Condition {
        column,
        op,
        operand,
    })
}
