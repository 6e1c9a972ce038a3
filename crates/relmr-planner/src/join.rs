//! Join compiler: `JoinQuery` → tagged mappers + co-group reducer.

use std::sync::Arc;

use relmr_core::error::Result;
use relmr_core::query::JoinQuery;
use relmr_core::schema::{registry, Relation};
use relmr_core::types::ValueType;
use relmr_operators::{CoGroupReducer, EqualityFilter, JoinMapper};

use crate::logical::ResolvedJoin;
use crate::physical::{CompiledPlan, InputBinding};

pub const JOB_NAME: &str = "InnerJoin";

fn mapper_for(resolved: &ResolvedJoin, relation: Relation, key_index: usize) -> InputBinding {
    let filter = resolved
        .predicate_for(relation)
        .map(|p| EqualityFilter::new(p.column_index, &p.value));
    InputBinding {
        relation,
        file_name: registry().file_name(relation),
        mapper: Arc::new(JoinMapper::new(relation, key_index, filter)),
    }
}

/// Build the job for an already-resolved join.
pub fn build_join(resolved: &ResolvedJoin) -> CompiledPlan {
    CompiledPlan {
        job_name: JOB_NAME,
        inputs: vec![
            mapper_for(resolved, resolved.left, resolved.left_key_index),
            mapper_for(resolved, resolved.right, resolved.right_key_index),
        ],
        combiner: None,
        reducer: Arc::new(CoGroupReducer::new(resolved.left, resolved.right)),
        output_key: ValueType::Text,
        output_value: ValueType::Text,
    }
}

/// Resolve and build. Fails with `PlanError::NoCommonKey` when the two
/// relations share no column.
pub fn compile_join(query: &JoinQuery) -> Result<CompiledPlan> {
    let resolved = ResolvedJoin::resolve(query)?;
    Ok(build_join(&resolved))
}
