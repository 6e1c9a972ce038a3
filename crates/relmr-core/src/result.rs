//! The record handed back to the caller once a query has run.
//!
//! Built in one step after the engine reports completion; a failed run never
//! produces one.

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;
use crate::id::{JobId, PartitionId};

/// Human-readable shape of each phase of a compiled job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanDescription {
    Join {
        first_mapper: String,
        second_mapper: String,
        reducer: String,
    },
    GroupBy {
        mapper: String,
        combiner: Option<String>,
        reducer: String,
    },
}

impl PlanDescription {
    /// `(label, text)` pairs in phase order, for printing.
    pub fn phases(&self) -> Vec<(&'static str, &str)> {
        match self {
            PlanDescription::Join {
                first_mapper,
                second_mapper,
                reducer,
            } => vec![
                ("First mapper", first_mapper.as_str()),
                ("Second mapper", second_mapper.as_str()),
                ("Join reducer", reducer.as_str()),
            ],
            PlanDescription::GroupBy {
                mapper,
                combiner,
                reducer,
            } => {
                let mut out = vec![("Group-by mapper", mapper.as_str())];
                if let Some(c) = combiner {
                    out.push(("Group-by combiner", c.as_str()));
                }
                out.push(("Group-by reducer", reducer.as_str()));
                out
            }
        }
    }
}

/// Where one output partition can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLocator {
    pub partition: PartitionId,
    pub path: String,
    /// Present when the engine was configured with a locator base URL.
    pub url: Option<String>,
}

impl OutputLocator {
    /// The URL when there is one, otherwise the path.
    pub fn href(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub job_id: JobId,

    /// Stable hash of the query descriptor and plan text.
    pub plan_hash: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,

    pub plans: PlanDescription,

    /// Milliseconds since Unix epoch (UTC), as reported by the engine.
    pub started_ms: u64,
    pub finished_ms: u64,
    /// Wall-clock time of the job; `finished_ms - started_ms`, never negative.
    pub duration_ms: u64,

    pub outputs: Vec<OutputLocator>,
}

impl ExecutionResult {
    pub fn new(
        plan_hash: Hash256,
        plans: PlanDescription,
        started_ms: u64,
        finished_ms: u64,
        outputs: Vec<OutputLocator>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            plan_hash,
            engine_version: crate::VERSION.to_string(),
            plans,
            started_ms,
            finished_ms,
            duration_ms: finished_ms.saturating_sub(started_ms),
            outputs,
        }
    }

    /// Duration as shown to users, e.g. `1532 milliseconds`.
    pub fn execution_time(&self) -> String {
        format!("{} milliseconds", self.duration_ms)
    }
}
