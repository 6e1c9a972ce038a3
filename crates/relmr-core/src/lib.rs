#![forbid(unsafe_code)]
//! relmr-core: shared vocabulary for the relmr compiler.
//!
//! - `schema`: the closed relation catalog and the process-wide registry
//!   (column positions, backing files, pairwise join keys).
//! - `query`: query descriptors handed over by a parser collaborator.
//! - `types`: intermediate key/value records and the record delimiters.
//! - `result`: the immutable per-query `ExecutionResult`.
//!
//! No I/O and no threads live here; every crate above depends on this one.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod query;
pub mod result;
pub mod schema;
pub mod types;

/// Version string recorded in every `ExecutionResult`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
