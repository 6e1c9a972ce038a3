//! relmr CLI: run, explain and validate join / group-by query files.

use clap::{Parser, Subcommand};
use relmr_core::config::EngineConfig;
use relmr_core::schema::Relation;
use relmr_exec::{run_query, LocalEngine, QueryOutcome};
use relmr_planner::{compile, parse_yaml_query, ParsedQuery, QueryConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relmr")]
#[command(about = "Compile equality joins and thresholded GROUP BY queries into map/reduce jobs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a query from a YAML file on the local engine
    Run {
        /// Path to the query YAML file
        #[arg(short, long)]
        query: PathBuf,

        /// Directory holding users.csv, zipcodes.csv, movies.csv, rating.csv
        #[arg(long)]
        input_dir: Option<String>,

        /// Output directory (cleared before the run)
        #[arg(long)]
        output_dir: Option<String>,

        /// Number of reduce tasks / part files
        #[arg(long)]
        reducers: Option<usize>,

        /// Maximum parallel tasks
        #[arg(long)]
        max_parallel: Option<usize>,

        /// Skip the combiner even when the plan has one
        #[arg(long)]
        no_combiner: bool,

        /// Base URL for output locators, e.g. http://localhost:9870
        #[arg(long)]
        locator_base_url: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a query file and compile it without running
    Validate {
        #[arg(short, long)]
        query: PathBuf,
    },

    /// Show the mapper / combiner / reducer shapes for a query
    Explain {
        #[arg(short, long)]
        query: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List the known tables, their files and columns
    Schema {
        /// Only this table
        #[arg(long)]
        table: Option<String>,
    },
}

/// Overrides given on the command line; they win over file and env values.
#[derive(Debug, Default)]
struct CliOverrides {
    input_dir: Option<String>,
    output_dir: Option<String>,
    reducers: Option<usize>,
    max_parallel: Option<usize>,
    no_combiner: bool,
    locator_base_url: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RELMR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            query,
            input_dir,
            output_dir,
            reducers,
            max_parallel,
            no_combiner,
            locator_base_url,
            json,
        } => {
            let overrides = CliOverrides {
                input_dir,
                output_dir,
                reducers,
                max_parallel,
                no_combiner,
                locator_base_url,
            };
            run(&query, overrides, json)
        }
        Commands::Validate { query } => validate(&query).map(|_| println!("✓ Query is valid")),
        Commands::Explain { query, json } => explain(&query, json),
        Commands::Schema { table } => schema(table.as_deref()),
    };

    if let Err(e) = outcome {
        error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_query(path: &Path) -> Result<ParsedQuery, Box<dyn std::error::Error>> {
    let yaml = fs::read_to_string(path)?;
    let parsed = parse_yaml_query(&yaml)?;
    debug!(path = %path.display(), has_config = parsed.config != QueryConfig::default(), "loaded query file");
    Ok(parsed)
}

/// defaults < env < query file `config:` < command line.
fn resolve_config(file: &QueryConfig, cli: &CliOverrides) -> EngineConfig {
    let mut config = EngineConfig::from_env();
    apply_query_config(&mut config, file);
    apply_cli_overrides(&mut config, cli);
    config
}

fn apply_query_config(cfg: &mut EngineConfig, doc: &QueryConfig) {
    doc.apply_to(cfg);
}

fn apply_cli_overrides(cfg: &mut EngineConfig, cli: &CliOverrides) {
    if let Some(dir) = &cli.input_dir {
        cfg.input_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(n) = cli.reducers {
        cfg.num_reducers = n;
    }
    if let Some(n) = cli.max_parallel {
        cfg.max_parallel_tasks = n;
    }
    if cli.no_combiner {
        cfg.combiner_enabled = false;
    }
    if let Some(url) = &cli.locator_base_url {
        cfg.locator_base_url = Some(url.clone());
    }
}

fn run(path: &Path, overrides: CliOverrides, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_query(path)?;
    let config = resolve_config(&parsed.config, &overrides);
    config.validate()?;
    info!(
        query = %path.display(),
        input_dir = %config.input_dir,
        output_dir = %config.output_dir,
        reducers = config.num_reducers,
        combiner = config.combiner_enabled,
        "resolved configuration"
    );

    let outcome = run_query(&parsed.query, &LocalEngine::new(), &config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        QueryOutcome::NoJoinKey { left, right } => {
            warn!(%left, %right, "query not run");
            println!("No join key exists between {left} and {right}; nothing was run.");
        }
        QueryOutcome::Executed(result) => {
            info!(job_id = %result.job_id, duration_ms = result.duration_ms, outputs = result.outputs.len(), "query executed");
            println!("✓ Query executed successfully");
            for (label, text) in result.plans.phases() {
                println!("  {label}: {text}");
            }
            println!("  Execution time: {}", result.execution_time());
            println!("  Plan hash: {}", result.plan_hash);
            println!("  Output:");
            for loc in &result.outputs {
                println!("    {}", loc.href());
            }
        }
    }
    Ok(())
}

fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_query(path)?;
    compile(&parsed.query)?;
    Ok(())
}

fn explain(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_query(path)?;
    let compiled = compile(&parsed.query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&compiled.description)?);
        return Ok(());
    }

    println!("Query Plan");
    println!("==========");
    println!();
    println!("Job: {}", compiled.plan.job_name);
    for input in &compiled.plan.inputs {
        println!("  Input: {} ({})", input.relation, input.file_name);
    }
    println!(
        "  Combiner: {}",
        if compiled.plan.has_combiner() { "yes" } else { "no" }
    );
    println!("  Plan hash: {}", compiled.plan_hash);
    println!();
    for (label, text) in compiled.description.phases() {
        println!("{label}:");
        println!("  {text}");
    }
    Ok(())
}

fn schema(table: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let relations: Vec<Relation> = match table {
        Some(name) => vec![name.parse()?],
        None => Relation::ALL.to_vec(),
    };
    for relation in relations {
        let schema = relmr_core::schema::schema(relation);
        println!("{} ({})", relation, schema.file_name());
        for (i, column) in schema.columns().iter().enumerate() {
            println!("  {i:>2}  {column}");
        }
    }
    Ok(())
}
