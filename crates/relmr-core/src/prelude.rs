//! Convenient re-exports for downstream crates.

pub use crate::config::EngineConfig;
pub use crate::error::{Error, PlanError, Result, SchemaError};
pub use crate::hash::Hash256;
pub use crate::id::{JobId, PartitionId, TaskId};
pub use crate::query::{
    AggregateFunction, AggregateSpec, EqualityPredicate, GroupByQuery, JoinQuery, QueryDescriptor,
};
pub use crate::result::{ExecutionResult, OutputLocator, PlanDescription};
pub use crate::schema::{registry, ColumnSchema, Relation, SchemaRegistry};
pub use crate::types::{KeyValue, FIELD_DELIMITER, TAG_SEPARATOR};
