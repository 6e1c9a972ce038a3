//! Grouped aggregation with a `> threshold` filter.
//!
//! Value rules per function:
//!
//! | fn    | mapper emits               | combiner          | reducer emits        |
//! |-------|----------------------------|-------------------|----------------------|
//! | COUNT | `1`                        | sum               | sum, if > T          |
//! | SUM   | target value               | sum               | sum, if > T          |
//! | MIN   | target value, if > T       | min, if > T       | min, if > T          |
//! | MAX   | target value, if > T       | max, if > T       | max, if > T          |
//!
//! MIN and MAX therefore discard candidates before the shuffle, and their
//! result is the min/max over contributions above T. Running the combiner
//! any number of times never changes that result.

use relmr_core::query::AggregateFunction;
use relmr_core::types::{split_fields, KeyValue, FIELD_DELIMITER};

use crate::traits::{field, Combiner, Mapper, OpError, Reducer};

fn parse_number(raw: &str) -> Result<i64, OpError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| OpError::Data(format!("'{raw}' is not an integer")))
}

fn parse_values(values: &[String]) -> Result<Vec<i64>, OpError> {
    values.iter().map(|v| parse_number(v)).collect()
}

/// Merge `values` and narrow back to `i64`. A total outside `i64` is a data
/// error; the exact total never depends on how values were grouped.
fn merge_values(function: AggregateFunction, values: &[String]) -> Result<Option<i64>, OpError> {
    function
        .merge(parse_values(values)?)
        .map(|total| {
            i64::try_from(total)
                .map_err(|_| OpError::Data(format!("{function} total {total} overflows i64")))
        })
        .transpose()
}

/// Projects the grouping key and extracts the per-record contribution.
#[derive(Debug, Clone)]
pub struct GroupByMapper {
    key_indices: Vec<usize>,
    function: AggregateFunction,
    /// `None` only for `COUNT(*)`.
    target_index: Option<usize>,
    threshold: i64,
}

impl GroupByMapper {
    pub fn new(
        key_indices: Vec<usize>,
        function: AggregateFunction,
        target_index: Option<usize>,
        threshold: i64,
    ) -> Self {
        Self {
            key_indices,
            function,
            target_index,
            threshold,
        }
    }

    fn group_key(&self, fields: &[&str]) -> Result<String, OpError> {
        let mut key = String::new();
        for (n, &idx) in self.key_indices.iter().enumerate() {
            if n > 0 {
                key.push(FIELD_DELIMITER);
            }
            key.push_str(field(fields, idx)?);
        }
        Ok(key)
    }

    fn target(&self, fields: &[&str]) -> Result<i64, OpError> {
        let idx = self.target_index.ok_or_else(|| {
            OpError::Data(format!("{} needs a target column", self.function))
        })?;
        parse_number(field(fields, idx)?)
    }
}

impl Mapper for GroupByMapper {
    fn name(&self) -> &'static str {
        "group_by_map"
    }

    fn map(&self, record: &str) -> Result<Option<KeyValue>, OpError> {
        let fields = split_fields(record);
        let key = self.group_key(&fields)?;

        let contribution = match self.function {
            AggregateFunction::Count => 1,
            AggregateFunction::Sum => self.target(&fields)?,
            AggregateFunction::Min | AggregateFunction::Max => {
                let v = self.target(&fields)?;
                if v <= self.threshold {
                    return Ok(None);
                }
                v
            }
        };

        Ok(Some(KeyValue::new(key, contribution.to_string())))
    }
}

/// Partial aggregation between map and shuffle.
#[derive(Debug, Clone, Copy)]
pub struct GroupByCombiner {
    pub function: AggregateFunction,
    pub threshold: i64,
}

impl GroupByCombiner {
    pub fn new(function: AggregateFunction, threshold: i64) -> Self {
        Self {
            function,
            threshold,
        }
    }
}

impl Combiner for GroupByCombiner {
    fn name(&self) -> &'static str {
        "group_by_combine"
    }

    fn combine(&self, _key: &str, values: &[String]) -> Result<Option<String>, OpError> {
        let Some(merged) = merge_values(self.function, values)? else {
            return Ok(None);
        };
        if self.function.filters_before_reduce() && merged <= self.threshold {
            return Ok(None);
        }
        Ok(Some(merged.to_string()))
    }
}

/// Final merge plus the threshold filter.
#[derive(Debug, Clone, Copy)]
pub struct GroupByReducer {
    pub function: AggregateFunction,
    pub threshold: i64,
}

impl GroupByReducer {
    pub fn new(function: AggregateFunction, threshold: i64) -> Self {
        Self {
            function,
            threshold,
        }
    }
}

impl Reducer for GroupByReducer {
    fn name(&self) -> &'static str {
        "group_by_reduce"
    }

    fn reduce(&self, key: &str, values: &[String]) -> Result<Vec<KeyValue>, OpError> {
        match merge_values(self.function, values)? {
            Some(total) if total > self.threshold => {
                Ok(vec![KeyValue::new(key, total.to_string())])
            }
            _ => Ok(vec![]),
        }
    }
}
