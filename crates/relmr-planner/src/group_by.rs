//! Group-by compiler: `GroupByQuery` → projecting mapper, partial-merge
//! combiner, thresholded reducer.

use std::sync::Arc;

use relmr_core::error::Result;
use relmr_core::query::GroupByQuery;
use relmr_core::schema::registry;
use relmr_core::types::ValueType;
use relmr_operators::{GroupByCombiner, GroupByMapper, GroupByReducer};

use crate::logical::ResolvedGroupBy;
use crate::physical::{CompiledPlan, InputBinding};

pub const JOB_NAME: &str = "GroupBy";

pub fn build_group_by(resolved: &ResolvedGroupBy) -> CompiledPlan {
    let function = resolved.function();
    let mapper = GroupByMapper::new(
        resolved.key_indices(),
        function,
        resolved.target_index,
        resolved.threshold,
    );

    CompiledPlan {
        job_name: JOB_NAME,
        inputs: vec![InputBinding {
            relation: resolved.relation,
            file_name: registry().file_name(resolved.relation),
            mapper: Arc::new(mapper),
        }],
        combiner: Some(Arc::new(GroupByCombiner::new(function, resolved.threshold))),
        reducer: Arc::new(GroupByReducer::new(function, resolved.threshold)),
        output_key: ValueType::Text,
        output_value: ValueType::Text,
    }
}

/// Resolve and build. An unsupported aggregate function fails here, before
/// any record is read.
pub fn compile_group_by(query: &GroupByQuery) -> Result<CompiledPlan> {
    let resolved = ResolvedGroupBy::resolve(query)?;
    Ok(build_group_by(&resolved))
}
