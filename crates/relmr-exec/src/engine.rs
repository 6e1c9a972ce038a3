//! The seam between the compiler and whatever runs the job.

use serde::{Deserialize, Serialize};

use relmr_core::config::EngineConfig;
use relmr_core::id::PartitionId;
use relmr_planner::physical::CompiledPlan;

use crate::runtime::ExecError;

/// One reduce output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionReport {
    pub partition: PartitionId,
    pub path: String,
    pub records: u64,
}

/// What an engine hands back after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub started_ms: u64,
    pub finished_ms: u64,
    pub partitions: Vec<PartitionReport>,
    /// Input lines dropped as malformed while reading or mapping.
    pub skipped_records: u64,
    /// Reduce keys dropped because their values could not be merged. With a
    /// combiner those values are partials, so they are counted per key.
    pub skipped_groups: u64,
    pub records_written: u64,
}

/// A batch engine. Submission is synchronous: `execute` returns once the job
/// has finished, or with the first fatal error. No partial report is ever
/// returned.
pub trait ExecutionEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn execute(&self, plan: &CompiledPlan, cfg: &EngineConfig) -> Result<JobReport, ExecError>;
}
