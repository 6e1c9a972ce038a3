//! Declarative query files.

pub mod yaml;

pub use yaml::{parse_yaml_query, DslError, ParsedQuery, QueryConfig, QueryFile};
