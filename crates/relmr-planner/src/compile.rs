//! Single entry point: descriptor → (job, description, plan hash).

use relmr_core::error::Result;
use relmr_core::hash::{hash_serde, Hash256};
use relmr_core::query::QueryDescriptor;
use relmr_core::result::PlanDescription;
use tracing::debug;

use crate::explain::{explain_group_by, explain_join};
use crate::group_by::build_group_by;
use crate::join::build_join;
use crate::logical::{ResolvedGroupBy, ResolvedJoin};
use crate::physical::CompiledPlan;

/// Everything the runner needs to submit a query and report on it.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub descriptor: QueryDescriptor,
    pub plan: CompiledPlan,
    pub description: PlanDescription,
    pub plan_hash: Hash256,
}

/// Resolve once, then build the operators and the description from the same
/// resolved form.
pub fn compile(descriptor: &QueryDescriptor) -> Result<CompiledQuery> {
    let (plan, description) = match descriptor {
        QueryDescriptor::Join(q) => {
            let resolved = ResolvedJoin::resolve(q)?;
            debug!(
                left = %resolved.left,
                right = %resolved.right,
                join_key = resolved.join_key,
                "compiled join"
            );
            (build_join(&resolved), explain_join(&resolved))
        }
        QueryDescriptor::GroupBy(q) => {
            let resolved = ResolvedGroupBy::resolve(q)?;
            debug!(
                relation = %resolved.relation,
                aggregate = %resolved.aggregate,
                threshold = resolved.threshold,
                "compiled group-by"
            );
            (build_group_by(&resolved), explain_group_by(&resolved))
        }
    };

    let plan_hash = hash_serde(&(descriptor, &description))?;

    Ok(CompiledQuery {
        descriptor: descriptor.clone(),
        plan,
        description,
        plan_hash,
    })
}
