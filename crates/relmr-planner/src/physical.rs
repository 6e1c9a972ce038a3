//! Compiled job: the map/combine/reduce triple handed to an engine.

use std::fmt;
use std::sync::Arc;

use relmr_core::schema::Relation;
use relmr_core::types::ValueType;
use relmr_operators::{Combiner, Mapper, Reducer};

/// One input source and the mapper that reads it.
#[derive(Clone)]
pub struct InputBinding {
    pub relation: Relation,
    /// Record file name relative to the engine's input directory.
    pub file_name: &'static str,
    pub mapper: Arc<dyn Mapper>,
}

/// A ready-to-run job. Every function is immutable and `Send + Sync`, so an
/// engine may clone the `Arc`s into as many tasks as it likes.
#[derive(Clone)]
pub struct CompiledPlan {
    pub job_name: &'static str,
    pub inputs: Vec<InputBinding>,
    pub combiner: Option<Arc<dyn Combiner>>,
    pub reducer: Arc<dyn Reducer>,
    pub output_key: ValueType,
    pub output_value: ValueType,
}

impl CompiledPlan {
    pub fn has_combiner(&self) -> bool {
        self.combiner.is_some()
    }
}

impl fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBinding")
            .field("relation", &self.relation)
            .field("file_name", &self.file_name)
            .field("mapper", &self.mapper.name())
            .finish()
    }
}

impl fmt::Debug for CompiledPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPlan")
            .field("job_name", &self.job_name)
            .field("inputs", &self.inputs)
            .field("combiner", &self.combiner.as_ref().map(|c| c.name()))
            .field("reducer", &self.reducer.name())
            .field("output_key", &self.output_key)
            .field("output_value", &self.output_value)
            .finish()
    }
}
