//! Record-level vocabulary shared by operators, engines and writers.
//!
//! Records are single lines of comma-separated fields. There is no quoting or
//! escaping: a field that contains the delimiter splits into two fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separates fields inside a record, grouping-key parts, and output columns.
pub const FIELD_DELIMITER: char = ',';

/// Separates the relation tag from the payload in join mapper values.
pub const TAG_SEPARATOR: char = '#';

/// Split a raw record into its fields.
pub fn split_fields(record: &str) -> Vec<&str> {
    record.split(FIELD_DELIMITER).collect()
}

/// One text key/value pair, as emitted by mappers, combiners and reducers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Output line form: `key,value`.
impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, FIELD_DELIMITER, self.value)
    }
}

/// Declared key/value types of a job's output. Both are text for every
/// plan this compiler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Text,
}
