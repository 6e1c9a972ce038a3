//! Query runner: compile → explain → submit → one result record.

use serde::Serialize;
use tracing::{info, warn};

use relmr_core::config::EngineConfig;
use relmr_core::error::{Error as CoreError, PlanError};
use relmr_core::query::QueryDescriptor;
use relmr_core::result::{ExecutionResult, OutputLocator};
use relmr_core::schema::Relation;
use relmr_planner::compile;

use crate::engine::{ExecutionEngine, PartitionReport};
use crate::runtime::ExecError;

/// What running a query produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome {
    Executed(Box<ExecutionResult>),
    /// The two relations share no column; nothing was submitted.
    NoJoinKey { left: Relation, right: Relation },
}

impl QueryOutcome {
    pub fn result(&self) -> Option<&ExecutionResult> {
        match self {
            QueryOutcome::Executed(r) => Some(r),
            QueryOutcome::NoJoinKey { .. } => None,
        }
    }
}

/// WebHDFS-style open URL for one part file.
pub fn locator_url(base: &str, output_dir: &str, file_name: &str) -> String {
    let base = base.trim_end_matches('/');
    let dir = output_dir.trim_end_matches('/');
    let sep = if dir.starts_with('/') { "" } else { "/" };
    format!("{base}/webhdfs/v1{sep}{dir}/{file_name}?op=OPEN")
}

fn locator(report: &PartitionReport, cfg: &EngineConfig) -> OutputLocator {
    let url = cfg
        .locator_base_url
        .as_deref()
        .map(|base| locator_url(base, &cfg.output_dir, &report.partition.part_file_name()));
    OutputLocator {
        partition: report.partition,
        path: report.path.clone(),
        url,
    }
}

/// Compile and run one query.
///
/// Schema and plan errors surface before anything is submitted. An engine
/// failure is returned as-is and no result is built.
pub fn run_query(
    descriptor: &QueryDescriptor,
    engine: &dyn ExecutionEngine,
    cfg: &EngineConfig,
) -> Result<QueryOutcome, ExecError> {
    let compiled = match compile(descriptor) {
        Ok(c) => c,
        Err(CoreError::Plan(PlanError::NoCommonKey { left, right })) => {
            warn!(%left, %right, "no join key between tables; query not submitted");
            return Ok(QueryOutcome::NoJoinKey { left, right });
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        engine = engine.name(),
        job = compiled.plan.job_name,
        plan_hash = %compiled.plan_hash,
        "submitting query"
    );
    let report = engine.execute(&compiled.plan, cfg)?;

    let outputs = report.partitions.iter().map(|p| locator(p, cfg)).collect();
    let result = ExecutionResult::new(
        compiled.plan_hash,
        compiled.description,
        report.started_ms,
        report.finished_ms,
        outputs,
    );
    info!(
        job_id = %result.job_id,
        time = %result.execution_time(),
        records = report.records_written,
        "query finished"
    );
    Ok(QueryOutcome::Executed(Box::new(result)))
}
