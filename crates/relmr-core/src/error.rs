use thiserror::Error;

use crate::schema::Relation;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

/// Lookups against the relation catalog. Always fatal to the current compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("table {0} does not exist")]
    UnknownRelation(String),

    #[error("column '{column}' does not exist in table {relation}")]
    UnknownColumn { relation: Relation, column: String },

    #[error("column index {index} is out of range for table {relation} ({len} columns)")]
    IndexOutOfRange {
        relation: Relation,
        index: usize,
        len: usize,
    },
}

/// Query shapes the compilers refuse to turn into a job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("aggregate function '{0}' is not supported (expected COUNT, SUM, MIN or MAX)")]
    UnsupportedAggregate(String),

    #[error("no join key exists between {left} and {right}")]
    NoCommonKey { left: Relation, right: Relation },

    #[error("invalid group by: {0}")]
    InvalidGroupBy(String),

    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),
}
