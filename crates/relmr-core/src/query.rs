//! Query descriptors handed to the compilers.
//!
//! A parser collaborator produces these from query text; the compilers treat
//! them as already tokenized. Names are only resolved against the registry at
//! compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::schema::Relation;

/// One query: exactly one of the two supported operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryDescriptor {
    Join(JoinQuery),
    GroupBy(GroupByQuery),
}

/// `SELECT * FROM left INNER JOIN right [WHERE rel.col = 'value']`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinQuery {
    pub left: Relation,
    pub right: Relation,
    #[serde(default)]
    pub predicate: Option<EqualityPredicate>,
}

/// `relation.column = 'value'`, compared trimmed and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityPredicate {
    pub relation: Relation,
    pub column: String,
    pub value: String,
}

/// `SELECT g1, g2, FN(col) FROM relation GROUP BY g1, g2 HAVING FN(col) > threshold`.
///
/// `columns` lists the grouping columns in order followed by the aggregate
/// entry, e.g. `["occupation", "gender", "SUM(age)"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupByQuery {
    pub relation: Relation,
    pub columns: Vec<String>,
    pub threshold: i64,
}

impl GroupByQuery {
    /// Everything but the trailing aggregate entry.
    pub fn grouping_columns(&self) -> &[String] {
        match self.columns.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn aggregate_entry(&self) -> Option<&str> {
        self.columns.last().map(String::as_str)
    }
}

/// The closed set of aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Count,
    Sum,
    Min,
    Max,
}

impl AggregateFunction {
    pub const fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }

    /// MIN and MAX drop candidates `<= threshold` before the shuffle as well
    /// as after the final merge; SUM and COUNT only filter the final value.
    pub const fn filters_before_reduce(self) -> bool {
        matches!(self, AggregateFunction::Min | AggregateFunction::Max)
    }

    /// Merge partial values; `None` for an empty input.
    ///
    /// Sums are exact in `i128`, so the result is independent of order and
    /// grouping. Callers decide what to do when it does not fit an `i64`.
    pub fn merge<I>(self, values: I) -> Option<i128>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut iter = values.into_iter().map(i128::from);
        let first = iter.next()?;
        Some(match self {
            AggregateFunction::Min => iter.fold(first, i128::min),
            AggregateFunction::Max => iter.fold(first, i128::max),
            AggregateFunction::Sum | AggregateFunction::Count => first + iter.sum::<i128>(),
        })
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateFunction {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COUNT" => Ok(AggregateFunction::Count),
            "SUM" => Ok(AggregateFunction::Sum),
            "MIN" => Ok(AggregateFunction::Min),
            "MAX" => Ok(AggregateFunction::Max),
            _ => Err(PlanError::UnsupportedAggregate(s.trim().to_string())),
        }
    }
}

/// Parsed `FN(column)` entry. `column` is `None` for `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub function: AggregateFunction,
    pub column: Option<String>,
}

impl AggregateSpec {
    /// The column name as written, `*` when absent.
    pub fn column_label(&self) -> &str {
        self.column.as_deref().unwrap_or("*")
    }
}

impl fmt::Display for AggregateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.column_label())
    }
}

impl FromStr for AggregateSpec {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let (func, rest) = entry.split_once('(').ok_or_else(|| {
            PlanError::InvalidGroupBy(format!("expected FN(column) as last entry, got '{entry}'"))
        })?;
        let column = rest.strip_suffix(')').ok_or_else(|| {
            PlanError::InvalidGroupBy(format!("unclosed parenthesis in '{entry}'"))
        })?;
        let function: AggregateFunction = func.parse()?;
        let column = column.trim();

        let column = match (function, column) {
            (_, "") => {
                return Err(PlanError::InvalidGroupBy(format!(
                    "missing aggregate column in '{entry}'"
                )))
            }
            (AggregateFunction::Count, "*") => None,
            (_, "*") => {
                return Err(PlanError::InvalidGroupBy(format!(
                    "{function} needs a column, got '*'"
                )))
            }
            (_, c) => Some(c.to_string()),
        };

        Ok(Self { function, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aggregate_specs() {
        let spec: AggregateSpec = "sum(amt)".parse().unwrap();
        assert_eq!(spec.function, AggregateFunction::Sum);
        assert_eq!(spec.column.as_deref(), Some("amt"));
        assert_eq!(spec.to_string(), "SUM(amt)");

        let count: AggregateSpec = "COUNT(*)".parse().unwrap();
        assert_eq!(count.column, None);
        assert_eq!(count.to_string(), "COUNT(*)");
    }

    #[test]
    fn rejects_unknown_functions_and_shapes() {
        assert_eq!(
            "AVG(age)".parse::<AggregateSpec>().unwrap_err(),
            PlanError::UnsupportedAggregate("AVG".into())
        );
        assert!(matches!(
            "age".parse::<AggregateSpec>(),
            Err(PlanError::InvalidGroupBy(_))
        ));
        assert!(matches!(
            "MAX(*)".parse::<AggregateSpec>(),
            Err(PlanError::InvalidGroupBy(_))
        ));
        assert!(matches!(
            "SUM(age".parse::<AggregateSpec>(),
            Err(PlanError::InvalidGroupBy(_))
        ));
    }

    #[test]
    fn merge_rules() {
        let vals = [5, -2, 9];
        assert_eq!(AggregateFunction::Min.merge(vals), Some(-2));
        assert_eq!(AggregateFunction::Max.merge(vals), Some(9));
        assert_eq!(AggregateFunction::Sum.merge(vals), Some(12));
        assert_eq!(AggregateFunction::Count.merge([1, 1, 1]), Some(3));
        assert_eq!(AggregateFunction::Sum.merge(std::iter::empty()), None);
    }

    #[test]
    fn sum_is_exact_past_i64_bounds() {
        let orders = [
            [i64::MAX, 1, -1],
            [1, -1, i64::MAX],
            [1, i64::MAX, -1],
            [-1, i64::MAX, 1],
        ];
        for vals in orders {
            assert_eq!(
                AggregateFunction::Sum.merge(vals),
                Some(i128::from(i64::MAX)),
                "{vals:?}"
            );
        }
        assert_eq!(
            AggregateFunction::Sum.merge([i64::MAX, 1]),
            Some(i128::from(i64::MAX) + 1)
        );
        assert_eq!(
            AggregateFunction::Min.merge([i64::MIN, 0]),
            Some(i128::from(i64::MIN))
        );
    }

    #[test]
    fn grouping_columns_exclude_aggregate_entry() {
        let q = GroupByQuery {
            relation: Relation::Users,
            columns: vec!["occupation".into(), "gender".into(), "COUNT(*)".into()],
            threshold: 0,
        };
        assert_eq!(q.grouping_columns(), &["occupation", "gender"]);
        assert_eq!(q.aggregate_entry(), Some("COUNT(*)"));
    }

    #[test]
    fn descriptor_serde_is_tagged() {
        let q = QueryDescriptor::Join(JoinQuery {
            left: Relation::Users,
            right: Relation::Zipcodes,
            predicate: None,
        });
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "join");
        assert_eq!(json["left"], "USERS");
        let back: QueryDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }
}
