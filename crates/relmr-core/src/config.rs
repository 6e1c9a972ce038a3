//! Engine configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one record file per relation (`users.csv`, ...).
    pub input_dir: String,

    /// Job output directory. Cleared before every run.
    pub output_dir: String,

    /// Number of reduce tasks, and so of `part-r-NNNNN` files.
    pub num_reducers: usize,

    /// Execution parallelism for map and reduce tasks.
    pub max_parallel_tasks: usize,

    /// Records per input split; each split becomes one map task.
    pub split_records: usize,

    /// Run the plan's combiner (if any) on each map task's output.
    pub combiner_enabled: bool,

    /// Optional WebHDFS-style base URL used to render output locators,
    /// e.g. `http://localhost:9870`.
    pub locator_base_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_dir: "data".to_string(),
            output_dir: "/tmp/relmr-output".to_string(),
            num_reducers: 1,
            max_parallel_tasks: 4,
            split_records: 10_000,
            combiner_enabled: true,
            locator_base_url: None,
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RELMR_INPUT_DIR`: directory with the relation files
    /// - `RELMR_OUTPUT_DIR`: job output directory
    /// - `RELMR_NUM_REDUCERS`: reduce task count
    /// - `RELMR_MAX_PARALLEL_TASKS`: max parallel tasks
    /// - `RELMR_SPLIT_RECORDS`: records per map split
    /// - `RELMR_COMBINER`: `true`/`false`
    /// - `RELMR_LOCATOR_BASE_URL`: base URL for output locators
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("RELMR_INPUT_DIR") {
            cfg.input_dir = s;
        }

        if let Ok(s) = std::env::var("RELMR_OUTPUT_DIR") {
            cfg.output_dir = s;
        }

        if let Ok(s) = std::env::var("RELMR_NUM_REDUCERS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.num_reducers = v;
            }
        }

        if let Ok(s) = std::env::var("RELMR_MAX_PARALLEL_TASKS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_parallel_tasks = v;
            }
        }

        if let Ok(s) = std::env::var("RELMR_SPLIT_RECORDS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.split_records = v;
            }
        }

        if let Ok(s) = std::env::var("RELMR_COMBINER") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.combiner_enabled = v;
            }
        }

        if let Ok(s) = std::env::var("RELMR_LOCATOR_BASE_URL") {
            cfg.locator_base_url = Some(s);
        }

        cfg
    }

    /// Reject settings no engine can run with.
    pub fn validate(&self) -> Result<()> {
        if self.num_reducers == 0 {
            return Err(Error::Config("num_reducers must be at least 1".into()));
        }
        if self.max_parallel_tasks == 0 {
            return Err(Error::Config("max_parallel_tasks must be at least 1".into()));
        }
        if self.split_records == 0 {
            return Err(Error::Config("split_records must be at least 1".into()));
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::Config("output_dir must not be empty".into()));
        }
        Ok(())
    }
}
