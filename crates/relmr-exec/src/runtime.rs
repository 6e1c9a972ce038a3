//! Runtime: run a `CompiledPlan` on local threads and local files.
//!
//! Phases:
//! - map: every relation file is cut into splits, each split is one task;
//!   with a combiner enabled each task combines its own output per key.
//! - shuffle: task outputs are merged per reduce partition, keys sorted.
//! - reduce: one task per partition writes `part-r-NNNNN`.
//!
//! Malformed records are skipped with a warning and counted, as are reduce
//! keys whose values cannot be merged; everything else fails the whole job.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info, warn};

use relmr_core::config::EngineConfig;
use relmr_core::error::{PlanError, SchemaError};
use relmr_core::hash::partition_for;
use relmr_core::id::{PartitionId, TaskId};
use relmr_core::types::KeyValue;
use relmr_io::{prepare_output_dir, read_splits, PartWriter, Split};
use relmr_operators::{Combiner, Mapper, Reducer};
use relmr_planner::physical::{CompiledPlan, InputBinding};

use crate::engine::{ExecutionEngine, JobReport, PartitionReport};
use crate::metrics::emit_span;
use crate::scheduler::run_bounded;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("plan: {0}")]
    Plan(#[from] PlanError),
    #[error("config: {0}")]
    Config(String),
    #[error("engine: {0}")]
    Engine(String),
    #[error("io: {0}")]
    Io(#[from] relmr_io::Error),
}

impl From<relmr_core::error::Error> for ExecError {
    fn from(e: relmr_core::error::Error) -> Self {
        use relmr_core::error::Error as CoreError;
        match e {
            CoreError::Schema(e) => ExecError::Schema(e),
            CoreError::Plan(e) => ExecError::Plan(e),
            CoreError::Config(msg) => ExecError::Config(msg),
            CoreError::Hash(msg) => ExecError::Engine(format!("hashing: {msg}")),
        }
    }
}

/// Grouped intermediate pairs of one reduce partition.
type Groups = BTreeMap<String, Vec<String>>;

struct MapTask<'a> {
    id: TaskId,
    input: &'a InputBinding,
    split: Split,
}

struct MapOutput {
    partitions: Vec<Groups>,
    skipped: u64,
}

struct ReduceOutput {
    report: PartitionReport,
    skipped_groups: u64,
}

/// In-process engine over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEngine;

impl LocalEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionEngine for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn execute(&self, plan: &CompiledPlan, cfg: &EngineConfig) -> Result<JobReport, ExecError> {
        cfg.validate()?;
        let started_ms = now_millis();
        info!(job = plan.job_name, inputs = plan.inputs.len(), "starting job");

        let input_dir = Path::new(&cfg.input_dir);
        let mut tasks = Vec::new();
        for input in &plan.inputs {
            for split in read_splits(input_dir.join(input.file_name), cfg.split_records)? {
                tasks.push(MapTask {
                    id: TaskId::new(tasks.len() as u64),
                    input,
                    split,
                });
            }
        }
        let map_tasks = tasks.len();

        let combiner = if cfg.combiner_enabled {
            plan.combiner.as_deref()
        } else {
            None
        };
        let partitions = cfg.num_reducers;

        let outputs = run_bounded(tasks, cfg.max_parallel_tasks, |task| {
            Ok(run_map_task(task, combiner, partitions))
        })?;

        let mut skipped_records: u64 = 0;
        let mut shuffled: Vec<Groups> = vec![Groups::new(); partitions];
        for out in outputs {
            skipped_records += out.skipped;
            for (p, groups) in out.partitions.into_iter().enumerate() {
                for (key, mut values) in groups {
                    shuffled[p].entry(key).or_default().append(&mut values);
                }
            }
        }
        emit_span(
            "shuffle",
            &[
                ("map_tasks", map_tasks.to_string()),
                ("partitions", partitions.to_string()),
                ("keys", shuffled.iter().map(Groups::len).sum::<usize>().to_string()),
            ],
        );

        let output_dir = PathBuf::from(&cfg.output_dir);
        prepare_output_dir(&output_dir)?;

        let reduce_tasks: Vec<(PartitionId, Groups)> = shuffled
            .into_iter()
            .enumerate()
            .map(|(p, groups)| (PartitionId::new(p as u64), groups))
            .collect();
        let reducer = plan.reducer.as_ref();
        let reduced = run_bounded(reduce_tasks, cfg.max_parallel_tasks, |(partition, groups)| {
            run_reduce_task(reducer, &output_dir, partition, groups)
        })?;

        let mut skipped_groups: u64 = 0;
        let mut reports = Vec::with_capacity(reduced.len());
        for out in reduced {
            skipped_groups += out.skipped_groups;
            reports.push(out.report);
        }
        let records_written: u64 = reports.iter().map(|r| r.records).sum();
        let finished_ms = now_millis();

        info!(
            job = plan.job_name,
            map_tasks,
            records_written,
            skipped_records,
            skipped_groups,
            elapsed_ms = finished_ms.saturating_sub(started_ms),
            "job finished"
        );

        Ok(JobReport {
            started_ms,
            finished_ms,
            partitions: reports,
            skipped_records,
            skipped_groups,
            records_written,
        })
    }
}

fn run_map_task(task: MapTask<'_>, combiner: Option<&dyn Combiner>, partitions: usize) -> MapOutput {
    let mapper: &dyn Mapper = task.input.mapper.as_ref();
    let mut local: Groups = Groups::new();
    let mut skipped: u64 = task.split.skipped;

    for (offset, record) in task.split.records.iter().enumerate() {
        match mapper.map(record) {
            Ok(Some(KeyValue { key, value })) => local.entry(key).or_default().push(value),
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                warn!(
                    task = %task.id,
                    relation = %task.input.relation,
                    line = task.split.first_line + offset,
                    error = %e,
                    "skipping malformed record"
                );
            }
        }
    }

    if let Some(combiner) = combiner {
        local = combine_groups(combiner, local, task.id);
    }

    let mut out = vec![Groups::new(); partitions];
    for (key, values) in local {
        let p = partition_for(&key, partitions);
        out[p].insert(key, values);
    }

    debug!(task = %task.id, mapper = mapper.name(), records = task.split.len(), skipped, "map task done");
    MapOutput {
        partitions: out,
        skipped,
    }
}

fn combine_groups(combiner: &dyn Combiner, groups: Groups, task: TaskId) -> Groups {
    let mut combined = Groups::new();
    for (key, values) in groups {
        match combiner.combine(&key, &values) {
            Ok(Some(v)) => {
                combined.insert(key, vec![v]);
            }
            Ok(None) => {}
            // Combining is optional; hand the raw values on and let the
            // reducer decide.
            Err(e) => {
                warn!(%task, key = %key, error = %e, "combiner failed, passing values through");
                combined.insert(key, values);
            }
        }
    }
    combined
}

fn run_reduce_task(
    reducer: &dyn Reducer,
    output_dir: &Path,
    partition: PartitionId,
    groups: Groups,
) -> Result<ReduceOutput, ExecError> {
    let (path, mut writer) = PartWriter::in_dir(output_dir, &partition.part_file_name())?;
    let mut skipped_groups: u64 = 0;

    for (key, values) in &groups {
        match reducer.reduce(key, values) {
            Ok(pairs) => {
                for kv in &pairs {
                    writer.write(kv)?;
                }
            }
            Err(e) => {
                skipped_groups += 1;
                warn!(%partition, key = %key, values = values.len(), error = %e, "skipping malformed group");
            }
        }
    }

    let records = writer.finish()?;
    debug!(%partition, keys = groups.len(), records, "reduce task done");
    Ok(ReduceOutput {
        report: PartitionReport {
            partition,
            path: path.display().to_string(),
            records,
        },
        skipped_groups,
    })
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
