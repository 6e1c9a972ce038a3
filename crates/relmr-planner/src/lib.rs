#![forbid(unsafe_code)]
//! relmr-planner: query descriptor → resolved query → map/combine/reduce job
//! plus a readable description of each phase.
//!
//! Design:
//! - `logical` binds column names to registry positions once.
//! - `join` / `group_by` build operators from the resolved form.
//! - `explain` renders the same resolved form as text.
//! - `dsl` loads descriptors from YAML files.
//!
//! NOTE: no I/O here; the engine owns reading and writing records.

pub mod compile;
pub mod dsl;
pub mod explain;
pub mod group_by;
pub mod join;
pub mod logical;
pub mod physical;

pub use compile::{compile, CompiledQuery};
pub use dsl::yaml::{parse_yaml_query, DslError, ParsedQuery, QueryConfig};
pub use explain::{explain_group_by, explain_join};
pub use group_by::compile_group_by;
pub use join::compile_join;
pub use logical::{ResolvedGroupBy, ResolvedJoin, ResolvedPredicate};
pub use physical::{CompiledPlan, InputBinding};
