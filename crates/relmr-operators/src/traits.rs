//! Mapper / combiner / reducer traits.
//!
//! An engine calls `map` once per input record, `combine` zero or more times
//! on arbitrary subsets of one key's values, and `reduce` exactly once per key
//! with every value emitted for it.

use relmr_core::types::KeyValue;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    /// Malformed record or intermediate value. Handling is best effort.
    #[error("malformed data: {0}")]
    Data(String),
}

/// Per-record function.
///
/// Invariants:
/// - No state carried between calls; the same record always maps the same way.
/// - Emits at most one pair per record.
pub trait Mapper: Send + Sync + 'static {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    fn map(&self, record: &str) -> Result<Option<KeyValue>, OpError>;
}

/// Partial merge over a subset of one key's values.
///
/// Its output must be substitutable for its inputs: combining any partition
/// of a key's values and then reducing equals reducing them all directly.
pub trait Combiner: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Returns the merged value, or `None` when nothing should be forwarded.
    fn combine(&self, key: &str, values: &[String]) -> Result<Option<String>, OpError>;
}

/// Final per-key function.
pub trait Reducer: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn reduce(&self, key: &str, values: &[String]) -> Result<Vec<KeyValue>, OpError>;
}

/// Field `index` of a split record, or a data error naming the shortfall.
pub(crate) fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, OpError> {
    fields.get(index).copied().ok_or_else(|| {
        OpError::Data(format!(
            "record has {} fields, needed field {}",
            fields.len(),
            index
        ))
    })
}
