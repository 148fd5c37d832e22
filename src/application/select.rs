// Filter & select stage: predicate over raw rows, then schema projection
use crate::domain::record::{FieldSchema, FilteredRecord, RawRecord};
use std::collections::HashSet;

/// A condition evaluated against raw (uncoerced) column values.
#[derive(Debug, Clone)]
pub enum Predicate {
    Equals { column: String, value: String },
    NotEquals { column: String, value: String },
    OneOf { column: String, values: HashSet<String> },
    YearBetween { column: String, min: i32, max: i32 },
    Present { column: String },
}

impl Predicate {
    pub fn equals(column: &str, value: &str) -> Self {
        Predicate::Equals {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn not_equals(column: &str, value: &str) -> Self {
        Predicate::NotEquals {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn one_of<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::OneOf {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn year_between(column: &str, min: i32, max: i32) -> Self {
        Predicate::YearBetween {
            column: column.to_string(),
            min,
            max,
        }
    }

    pub fn present(column: &str) -> Self {
        Predicate::Present {
            column: column.to_string(),
        }
    }

    pub fn matches(&self, record: &RawRecord) -> bool {
        match self {
            Predicate::Equals { column, value } => record.get(column) == Some(value.as_str()),
            Predicate::NotEquals { column, value } => record.get(column) != Some(value.as_str()),
            Predicate::OneOf { column, values } => {
                record.get(column).is_some_and(|v| values.contains(v))
            }
            Predicate::YearBetween { column, min, max } => record
                .get(column)
                .and_then(|v| v.trim().parse::<i32>().ok())
                .is_some_and(|year| year >= *min && year <= *max),
            Predicate::Present { column } => record.get(column).is_some_and(|v| !v.trim().is_empty()),
        }
    }
}

/// A conjunction of predicates. An empty selection keeps every row.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    predicates: Vec<Predicate>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add the predicate only when there is something to filter on.
    pub fn with_optional(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(predicate) => self.with(predicate),
            None => self,
        }
    }

    pub fn matches(&self, record: &RawRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}

/// Keep matching rows in input order and project each through the schema.
///
/// Rows whose required fields fail coercion are dropped; every other invalid
/// value takes its schema fallback.
pub fn select(records: &[RawRecord], selection: &Selection, schema: &FieldSchema) -> Vec<FilteredRecord> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .filter_map(|record| schema.coerce(record))
        .collect()
}
