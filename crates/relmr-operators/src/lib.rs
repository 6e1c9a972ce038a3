#![forbid(unsafe_code)]
//! relmr-operators: the per-record and per-key functions of a compiled job.
//!
//! Design intent:
//! - Every operator is an immutable value built by the planner. It holds only
//!   resolved column positions and the query's constants, so an engine can
//!   share one instance across any number of threads.
//! - Operators never touch files; engines feed them records and values.
//! - Malformed records surface as `OpError::Data`; the engine decides whether
//!   to skip or fail.

pub mod traits;

pub mod aggregate;
pub mod filter;
pub mod join;

pub use aggregate::{GroupByCombiner, GroupByMapper, GroupByReducer};
pub use filter::EqualityFilter;
pub use join::{CoGroupReducer, JoinMapper};
pub use traits::{Combiner, Mapper, OpError, Reducer};
