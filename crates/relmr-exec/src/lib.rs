#![forbid(unsafe_code)]
//! relmr-exec: the engine seam, a local multi-threaded engine, and the query
//! runner that ties compile, explain and execution together.
//!
//! `LocalEngine` reads one relation file per input, runs map tasks over
//! fixed-size splits, optionally combines per task, hash-partitions keys
//! across reduce tasks and writes one `part-r-NNNNN` file per partition.

pub mod engine;
pub mod metrics;
pub mod query;
pub mod runtime;
pub mod scheduler;

pub use engine::{ExecutionEngine, JobReport, PartitionReport};
pub use query::{run_query, QueryOutcome};
pub use runtime::{ExecError, LocalEngine};
