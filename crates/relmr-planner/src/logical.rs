//! Resolved query forms: descriptor names bound to registry positions.
//!
//! Resolution happens once per query. The compilers build operators from
//! these values and the explainer renders the same values, so the two can
//! never disagree about which columns a job touches.

use relmr_core::error::{PlanError, Result};
use relmr_core::query::{AggregateSpec, GroupByQuery, JoinQuery};
use relmr_core::schema::{registry, Relation};

pub use relmr_core::query::{AggregateFunction, EqualityPredicate, QueryDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPredicate {
    pub relation: Relation,
    pub column: String,
    pub column_index: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJoin {
    pub left: Relation,
    pub right: Relation,
    pub join_key: &'static str,
    pub left_key_index: usize,
    pub right_key_index: usize,
    pub predicate: Option<ResolvedPredicate>,
}

impl ResolvedJoin {
    pub fn resolve(query: &JoinQuery) -> Result<Self> {
        let reg = registry();
        let join_key = reg
            .join_key(query.left, query.right)
            .ok_or(PlanError::NoCommonKey {
                left: query.left,
                right: query.right,
            })?;

        let left_key_index = reg.column_index(query.left, join_key)?;
        let right_key_index = reg.column_index(query.right, join_key)?;

        let predicate = match &query.predicate {
            None => None,
            Some(p) => {
                if p.relation != query.left && p.relation != query.right {
                    return Err(PlanError::InvalidPredicate(format!(
                        "predicate table {} is not part of the join {} / {}",
                        p.relation, query.left, query.right
                    ))
                    .into());
                }
                let column_index = reg.column_index(p.relation, &p.column)?;
                Some(ResolvedPredicate {
                    relation: p.relation,
                    column: p.column.clone(),
                    column_index,
                    value: p.value.clone(),
                })
            }
        };

        Ok(Self {
            left: query.left,
            right: query.right,
            join_key,
            left_key_index,
            right_key_index,
            predicate,
        })
    }

    /// The predicate if it is scoped to `relation`.
    pub fn predicate_for(&self, relation: Relation) -> Option<&ResolvedPredicate> {
        self.predicate.as_ref().filter(|p| p.relation == relation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroupBy {
    pub relation: Relation,
    /// Grouping columns with their positions, in declared order.
    pub grouping: Vec<(String, usize)>,
    pub aggregate: AggregateSpec,
    pub target_index: Option<usize>,
    pub threshold: i64,
}

impl ResolvedGroupBy {
    pub fn resolve(query: &GroupByQuery) -> Result<Self> {
        let entry = query.aggregate_entry().ok_or_else(|| {
            PlanError::InvalidGroupBy("no columns given".to_string())
        })?;
        // Fail on the function before looking at any column.
        let aggregate: AggregateSpec = entry.parse()?;

        if query.grouping_columns().is_empty() {
            return Err(PlanError::InvalidGroupBy(format!(
                "at least one grouping column is required before {aggregate}"
            ))
            .into());
        }

        let reg = registry();
        let grouping = query
            .grouping_columns()
            .iter()
            .map(|c| -> Result<(String, usize)> {
                Ok((c.clone(), reg.column_index(query.relation, c)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let target_index = match &aggregate.column {
            Some(c) => Some(reg.column_index(query.relation, c)?),
            None => None,
        };

        Ok(Self {
            relation: query.relation,
            grouping,
            aggregate,
            target_index,
            threshold: query.threshold,
        })
    }

    pub fn function(&self) -> AggregateFunction {
        self.aggregate.function
    }

    pub fn key_indices(&self) -> Vec<usize> {
        self.grouping.iter().map(|(_, i)| *i).collect()
    }
}
