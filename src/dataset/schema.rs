//! Column Schema
//!
//! The fixed set of canonical field names exposed to callers. Canonical names
//! map positionally onto the header row of the source CSV; the raw headers are
//! only ever surfaced through the column definitions listing.

use std::fmt;

/// Canonical field names, in the same order as the source file's columns
pub const COLUMNS: [&str; 27] = [
    "timestamp",
    "employment_type",
    "company_name",
    "company_size",
    "country",
    "city",
    "industry",
    "company_type",
    "industry_years",
    "current_years",
    "job_title",
    "job_ladder",
    "job_level",
    "required_hours",
    "actual_hours",
    "education",
    "salary",
    "bonus",
    "stock",
    "insurance",
    "vacation",
    "happy_on_current_position",
    "resign_in_the_next_12_months",
    "thoughts",
    "gender",
    "final_question",
    "bootcamp_attend",
];

/// A validated reference to one schema column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column(usize);

impl Column {
    /// The temporal column, coerced to a timestamp at load time
    pub const TIMESTAMP: Column = Column(0);

    /// Look up a column by its canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        COLUMNS.iter().position(|c| *c == name).map(Column)
    }

    /// Canonical field name
    pub fn name(self) -> &'static str {
        COLUMNS[self.0]
    }

    /// Position in the source file and in every row
    pub fn index(self) -> usize {
        self.0
    }

    /// Every column in schema order
    pub fn all() -> impl Iterator<Item = Column> {
        (0..COLUMNS.len()).map(Column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
