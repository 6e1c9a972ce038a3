//! Reduce-side (co-group) equality join.
//!
//! Both inputs are mapped to `(join key, TAG#payload)` and shuffled by key;
//! the reducer pairs every left payload with every right payload. There is no
//! combiner: a cross product over a partial group is not a partial answer.

pub mod cogroup;

use relmr_core::schema::Relation;
use relmr_core::types::{split_fields, KeyValue, FIELD_DELIMITER, TAG_SEPARATOR};

use crate::filter::EqualityFilter;
use crate::traits::{field, Mapper, OpError};

pub use cogroup::CoGroupReducer;

/// Tags, filters and projects records of one side of a join.
#[derive(Debug, Clone)]
pub struct JoinMapper {
    relation: Relation,
    key_index: usize,
    filter: Option<EqualityFilter>,
}

impl JoinMapper {
    pub fn new(relation: Relation, key_index: usize, filter: Option<EqualityFilter>) -> Self {
        Self {
            relation,
            key_index,
            filter,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn filter(&self) -> Option<&EqualityFilter> {
        self.filter.as_ref()
    }
}

impl Mapper for JoinMapper {
    fn name(&self) -> &'static str {
        "join_map"
    }

    fn map(&self, record: &str) -> Result<Option<KeyValue>, OpError> {
        let fields = split_fields(record);

        if let Some(filter) = &self.filter {
            if !filter.matches(&fields)? {
                return Ok(None);
            }
        }

        let key = field(&fields, self.key_index)?;

        // The key already travels as the pair's key; leave it out of the payload.
        let mut value = String::with_capacity(record.len() + self.relation.name().len() + 1);
        value.push_str(self.relation.name());
        value.push(TAG_SEPARATOR);
        let mut first = true;
        for (i, f) in fields.iter().enumerate() {
            if i == self.key_index {
                continue;
            }
            if !first {
                value.push(FIELD_DELIMITER);
            }
            value.push_str(f);
            first = false;
        }

        Ok(Some(KeyValue::new(key, value)))
    }
}
