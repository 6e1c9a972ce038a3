//! Co-group reducer: per-key cross product of the two tagged inputs.

use relmr_core::schema::Relation;
use relmr_core::types::{KeyValue, FIELD_DELIMITER, TAG_SEPARATOR};

use crate::traits::{OpError, Reducer};

#[derive(Debug, Clone, Copy)]
pub struct CoGroupReducer {
    pub left: Relation,
    pub right: Relation,
}

impl CoGroupReducer {
    pub fn new(left: Relation, right: Relation) -> Self {
        Self { left, right }
    }
}

impl Reducer for CoGroupReducer {
    fn name(&self) -> &'static str {
        "join_cogroup"
    }

    fn reduce(&self, key: &str, values: &[String]) -> Result<Vec<KeyValue>, OpError> {
        let mut left: Vec<&str> = Vec::new();
        let mut right: Vec<&str> = Vec::new();

        for v in values {
            let (tag, payload) = v.split_once(TAG_SEPARATOR).ok_or_else(|| {
                OpError::Data(format!("join value without relation tag: '{v}'"))
            })?;
            if tag == self.left.name() {
                left.push(payload);
            } else if tag == self.right.name() {
                right.push(payload);
            }
            // Other tags cannot come from this job's mappers; ignore them.
        }

        let mut out = Vec::with_capacity(left.len() * right.len());
        for l in &left {
            for r in &right {
                out.push(KeyValue::new(
                    key,
                    format!("{l}{FIELD_DELIMITER}{r}"),
                ));
            }
        }
        Ok(out)
    }
}
