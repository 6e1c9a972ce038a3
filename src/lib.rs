//! relmr: compile equality joins and thresholded GROUP BY queries over a
//! fixed relation catalog into map/combine/reduce jobs.
//!
//! This crate re-exports the workspace members under one name.

pub use relmr_core;
pub use relmr_exec;
pub use relmr_io;
pub use relmr_operators;
pub use relmr_planner;

pub use relmr_core::prelude::*;
pub use relmr_exec::{run_query, ExecutionEngine, LocalEngine, QueryOutcome};
pub use relmr_planner::{compile, parse_yaml_query};
