//! YAML → `QueryDescriptor` loader.
//!
//! Example:
//! ```yaml
//! config:
//!   output_dir: "/tmp/relmr-out"
//!   num_reducers: 2
//! query:
//!   type: group_by
//!   relation: rating
//!   columns: ["movieid", "MAX(rating)"]
//!   threshold: 3
//! ```
//!
//! A join looks like:
//! ```yaml
//! query:
//!   type: join
//!   left: users
//!   right: zipcodes
//!   predicate: { relation: zipcodes, column: state, value: "MA" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use relmr_core::config::EngineConfig;
use relmr_core::query::QueryDescriptor;

#[derive(Debug, Error)]
pub enum DslError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid query file: {0}")]
    Invalid(String),
}

/// Raw document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFile {
    #[serde(default)]
    pub config: Option<QueryConfig>,
    pub query: QueryDescriptor,
}

/// Per-query engine overrides. Anything left out keeps the value from the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub num_reducers: Option<usize>,
    pub combiner: Option<bool>,
}

impl QueryConfig {
    /// Overlay the set fields onto `cfg`.
    pub fn apply_to(&self, cfg: &mut EngineConfig) {
        if let Some(dir) = &self.input_dir {
            cfg.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if let Some(n) = self.num_reducers {
            cfg.num_reducers = n;
        }
        if let Some(enabled) = self.combiner {
            cfg.combiner_enabled = enabled;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub query: QueryDescriptor,
    pub config: QueryConfig,
}

pub fn parse_yaml_query(yaml_src: &str) -> Result<ParsedQuery, DslError> {
    if yaml_src.trim().is_empty() {
        return Err(DslError::Invalid("empty document".into()));
    }
    let doc: QueryFile = serde_yaml::from_str(yaml_src)?;
    let config = doc.config.unwrap_or_default();

    if config.num_reducers == Some(0) {
        return Err(DslError::Invalid("num_reducers must be at least 1".into()));
    }

    Ok(ParsedQuery {
        query: doc.query,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relmr_core::query::{GroupByQuery, JoinQuery};
    use relmr_core::schema::Relation;

    #[test]
    fn parses_group_by_with_config() {
        let src = r#"
config:
  output_dir: "/tmp/out"
  num_reducers: 3
query:
  type: group_by
  relation: rating
  columns: ["movieid", "MAX(rating)"]
  threshold: 3
"#;
        let parsed = parse_yaml_query(src).unwrap();
        assert_eq!(
            parsed.query,
            QueryDescriptor::GroupBy(GroupByQuery {
                relation: Relation::Rating,
                columns: vec!["movieid".into(), "MAX(rating)".into()],
                threshold: 3,
            })
        );
        assert_eq!(parsed.config.output_dir.as_deref(), Some("/tmp/out"));
        assert_eq!(parsed.config.num_reducers, Some(3));
        assert_eq!(parsed.config.combiner, None);
    }

    #[test]
    fn parses_join_without_config() {
        let src = r#"
query:
  type: join
  left: USERS
  right: zipcodes
"#;
        let parsed = parse_yaml_query(src).unwrap();
        assert_eq!(
            parsed.query,
            QueryDescriptor::Join(JoinQuery {
                left: Relation::Users,
                right: Relation::Zipcodes,
                predicate: None,
            })
        );
        assert_eq!(parsed.config, QueryConfig::default());
    }

    #[test]
    fn unknown_relation_is_rejected() {
        let src = "query: { type: join, left: users, right: orders }";
        assert!(matches!(parse_yaml_query(src), Err(DslError::Yaml(_))));
    }

    #[test]
    fn zero_reducers_is_rejected() {
        let src = r#"
config: { num_reducers: 0 }
query: { type: join, left: users, right: rating }
"#;
        assert!(matches!(parse_yaml_query(src), Err(DslError::Invalid(_))));
    }

    #[test]
    fn config_overlays_only_set_fields() {
        let mut cfg = EngineConfig::default();
        let before = cfg.clone();
        QueryConfig {
            combiner: Some(false),
            ..Default::default()
        }
        .apply_to(&mut cfg);
        assert!(!cfg.combiner_enabled);
        assert_eq!(cfg.input_dir, before.input_dir);
        assert_eq!(cfg.num_reducers, before.num_reducers);
    }
}
