//! End-to-end runs on the local engine over temp MovieLens fixtures


use relmr_core::config::EngineConfig;
use relmr_core::query::{EqualityPredicate, GroupByQuery, JoinQuery, QueryDescriptor};
use relmr_core::result::PlanDescription;
use relmr_core::schema::Relation;
use relmr_exec::{run_query, ExecError, ExecutionEngine, JobReport, LocalEngine, QueryOutcome};
use relmr_planner::CompiledPlan;
use std::path::Path;
use test_data_gen::{engine_config, movielens_dir, output_lines};

fn executed(outcome: QueryOutcome) -> relmr_core::result::ExecutionResult {
    match outcome {
        QueryOutcome::Executed(result) => *result,
        other => panic!("expected an executed query, got {other:?}"),
    }
}

#[test]
fn test_join_users_zipcodes_end_to_end() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::Join(JoinQuery {
        left: Relation::Users,
        right: Relation::Zipcodes,
        predicate: None,
    });

    let result = executed(run_query(&query, &LocalEngine::new(), &config).expect("query runs"));
    assert!(matches!(result.plans, PlanDescription::Join { .. }));
    assert_eq!(result.outputs.len(), 1);
    assert!(result.finished_ms >= result.started_ms);
    assert!(result.execution_time().ends_with(" milliseconds"));

    assert_eq!(
        output_lines(Path::new(&config.output_dir)),
        vec![
            "32067,3,23,M,writer,PO BOX,Orange Park,FL",
            "85711,1,24,M,technician,STANDARD,Tucson,AZ",
            "94043,2,53,F,other,STANDARD,Mountain View,CA",
            "98101,6,42,M,executive,STANDARD,Seattle,WA",
        ]
    );
}

#[test]
fn test_join_with_predicate_end_to_end() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::Join(JoinQuery {
        left: Relation::Rating,
        right: Relation::Movies,
        predicate: Some(EqualityPredicate {
            relation: Relation::Movies,
            column: "title".into(),
            value: "toy story (1995)".into(),
        }),
    });

    executed(run_query(&query, &LocalEngine::new(), &config).expect("query runs"));
    let lines = output_lines(Path::new(&config.output_dir));
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.starts_with("1,") && l.contains("Toy Story")));
}

#[test]
fn test_group_by_count_end_to_end() {
    let dir = movielens_dir();
    let mut config = engine_config(dir.path());
    config.num_reducers = 2;
    let query = QueryDescriptor::GroupBy(GroupByQuery {
        relation: Relation::Users,
        columns: vec!["gender".into(), "COUNT(*)".into()],
        threshold: 2,
    });

    let result = executed(run_query(&query, &LocalEngine::new(), &config).expect("query runs"));
    assert_eq!(result.outputs.len(), 2);
    assert_eq!(result.outputs[1].partition.part_file_name(), "part-r-00001");
    assert_eq!(output_lines(Path::new(&config.output_dir)), vec!["M,4"]);
}

#[test]
fn test_group_by_min_end_to_end() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::GroupBy(GroupByQuery {
        relation: Relation::Rating,
        columns: vec!["movieid".into(), "MIN(rating)".into()],
        threshold: 2,
    });
    executed(run_query(&query, &LocalEngine::new(), &config).expect("query runs"));
    // movie 1: {5,4,2} -> 4; movie 2: {3,1} -> 3; movie 3: {5} -> 5
    assert_eq!(
        output_lines(Path::new(&config.output_dir)),
        vec!["1,4", "2,3", "3,5"]
    );
}

#[test]
fn test_combiner_setting_does_not_change_results() {
    let dir = movielens_dir();
    let query = QueryDescriptor::GroupBy(GroupByQuery {
        relation: Relation::Rating,
        columns: vec!["userid".into(), "SUM(rating)".into()],
        threshold: 4,
    });

    let mut config = engine_config(dir.path());
    run_query(&query, &LocalEngine::new(), &config).expect("query runs");
    let with = output_lines(Path::new(&config.output_dir));

    config.combiner_enabled = false;
    config.split_records = 1;
    run_query(&query, &LocalEngine::new(), &config).expect("query runs");
    let without = output_lines(Path::new(&config.output_dir));

    assert_eq!(with, without);
    assert_eq!(with, vec!["1,8", "3,7"]);
}

#[test]
fn test_no_join_key_is_not_an_error() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::Join(JoinQuery {
        left: Relation::Movies,
        right: Relation::Users,
        predicate: None,
    });
    let outcome = run_query(&query, &LocalEngine::new(), &config).expect("not an error");
    assert!(matches!(
        outcome,
        QueryOutcome::NoJoinKey {
            left: Relation::Movies,
            right: Relation::Users
        }
    ));
    assert!(outcome.result().is_none());
    assert!(!Path::new(&config.output_dir).exists());
}

#[test]
fn test_locators_use_base_url_when_configured() {
    let dir = movielens_dir();
    let mut config = engine_config(dir.path());
    config.locator_base_url = Some("http://localhost:9870".into());
    let query = QueryDescriptor::Join(JoinQuery {
        left: Relation::Users,
        right: Relation::Rating,
        predicate: None,
    });
    let result = executed(run_query(&query, &LocalEngine::new(), &config).expect("query runs"));
    let expected = format!(
        "http://localhost:9870/webhdfs/v1{}/part-r-00000?op=OPEN",
        config.output_dir
    );
    assert_eq!(result.outputs[0].url.as_deref(), Some(expected.as_str()));
    assert_eq!(result.outputs[0].href(), expected);
}

/// Fails every job without touching the filesystem.
struct BrokenEngine;

impl ExecutionEngine for BrokenEngine {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn execute(&self, _plan: &CompiledPlan, _cfg: &EngineConfig) -> Result<JobReport, ExecError> {
        Err(ExecError::Engine("cluster unavailable".into()))
    }
}

#[test]
fn test_engine_failure_leaves_no_result() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::GroupBy(GroupByQuery {
        relation: Relation::Users,
        columns: vec!["occupation".into(), "MAX(age)".into()],
        threshold: 0,
    });
    let err = run_query(&query, &BrokenEngine, &config).unwrap_err();
    assert_eq!(err.to_string(), "engine: cluster unavailable");
}

#[test]
fn test_plan_errors_surface_before_submission() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::GroupBy(GroupByQuery {
        relation: Relation::Users,
        columns: vec!["occupation".into(), "MEDIAN(age)".into()],
        threshold: 0,
    });
    // BrokenEngine would fail differently if it were reached.
    let err = run_query(&query, &BrokenEngine, &config).unwrap_err();
    assert!(matches!(err, ExecError::Plan(_)));
}

#[test]
fn test_execution_result_serializes() {
    let dir = movielens_dir();
    let config = engine_config(dir.path());
    let query = QueryDescriptor::Join(JoinQuery {
        left: Relation::Movies,
        right: Relation::Rating,
        predicate: None,
    });
    let outcome = run_query(&query, &LocalEngine::new(), &config).expect("query runs");
    let json = serde_json::to_value(&outcome).expect("serializes");
    assert_eq!(json["outcome"], "executed");
    assert_eq!(json["plans"]["kind"], "join");
    assert!(json["plan_hash"].is_array() || json["plan_hash"].is_string());
    assert!(json["duration_ms"].is_u64());
    assert_eq!(
        json["duration_ms"].as_u64(),
        Some(json["finished_ms"].as_u64().unwrap() - json["started_ms"].as_u64().unwrap())
    );
}
