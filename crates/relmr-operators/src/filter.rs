//! Equality pre-filter for join mappers.
//!
//! Supports exactly one predicate shape: `column = literal`, compared after
//! trimming both sides and ignoring case.

use crate::traits::{field, OpError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    column_index: usize,
    /// Stored trimmed and lower-cased.
    literal: String,
}

impl EqualityFilter {
    pub fn new(column_index: usize, literal: &str) -> Self {
        Self {
            column_index,
            literal: literal.trim().to_lowercase(),
        }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// Whether the split record passes the predicate.
    pub fn matches(&self, fields: &[&str]) -> Result<bool, OpError> {
        let value = field(fields, self.column_index)?;
        Ok(value.trim().to_lowercase() == self.literal)
    }
}
