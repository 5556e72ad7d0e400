//! # Facility Address Refresh
//!
//! Command-line driver for the enrichment pipeline: loads configuration, wires
//! the configured resolver behind a rate limiter, runs the batches and prints
//! the run summary.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use facility_address::config::{ConfigManager, EnricherConfig, ResolverConfig, ResolverKind};
use facility_address::constants::DEFAULT_OUTPUT_STEM;
use facility_address::logging::init_structured_logging;
use facility_address::orchestration::{EnrichmentPipeline, RunSummary};
use facility_address::resolver::{
    AddressResolver, DirectoryResolver, NullResolver, PacedResolver,
};
use facility_address::PipelineError;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "facility-refresh")]
#[command(about = "Refresh medical facility addresses in checkpointed batches")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Input roster CSV (default: paths.input from configuration)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Final output CSV (default: <paths.output_dir>/updated_addresses_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Records per batch; one checkpoint is written per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Lookups in flight at once within a batch
    #[arg(long)]
    concurrency: Option<usize>,

    /// Minimum milliseconds between resolver calls
    #[arg(long)]
    min_interval_ms: Option<u64>,

    /// Resolve against a directory CSV of known current addresses
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Configuration directory (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment overrides to apply (default: FACILITY_ENV, APP_ENV, development)
    #[arg(short, long)]
    environment: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Enrichment run failed: {e:#}");
            eprintln!("error: {e:#}");
            exit_code(&e)
        }
    };
    process::exit(code);
}

/// 130 for a cancelled run, 1 for every other failure
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PipelineError>()
        .map_or(1, PipelineError::exit_code)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_or_default(cli.config_dir.clone(), &environment)
        .context("Failed to load configuration")?;

    let mut config = manager.config().clone();
    apply_overrides(&mut config, &cli);
    config.validate().map_err(PipelineError::from)?;

    init_structured_logging(&config.logging, &environment)
        .context("Failed to initialize logging")?;

    let input = cli.input.clone().unwrap_or_else(|| config.paths.input.clone());
    let output = cli.output.clone().unwrap_or_else(|| {
        config.paths.output_dir.join(format!(
            "{}_{}.csv",
            DEFAULT_OUTPUT_STEM,
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });

    let resolver = build_resolver(&config.resolver)?;
    let pipeline = EnrichmentPipeline::new(&config, resolver)?;

    let cancellation = pipeline.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; stopping after the in-flight lookup");
            cancellation.cancel();
        }
    });

    let report = pipeline.run(&input, &output).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print_summary(&report.summary);
    }
    Ok(())
}

fn apply_overrides(config: &mut EnricherConfig, cli: &Cli) {
    if let Some(batch_size) = cli.batch_size {
        config.pipeline.batch_size = batch_size;
    }
    if let Some(concurrency) = cli.concurrency {
        config.pipeline.lookup_concurrency = concurrency;
    }
    if let Some(interval) = cli.min_interval_ms {
        config.resolver.min_interval_ms = interval;
    }
    if let Some(directory) = &cli.directory {
        config.resolver.kind = ResolverKind::Directory;
        config.resolver.directory_path = Some(directory.clone());
    }
    let level = match cli.verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    if let Some(level) = level {
        config.logging.level = Some(level.to_string());
    }
}

fn build_resolver(config: &ResolverConfig) -> anyhow::Result<Arc<dyn AddressResolver>> {
    let interval = config.min_interval();
    let resolver: Arc<dyn AddressResolver> = match config.kind {
        ResolverKind::Null => Arc::new(PacedResolver::new(NullResolver, interval)),
        ResolverKind::Directory => {
            let path = config
                .directory_path
                .as_ref()
                .context("resolver.directory_path is required for the directory resolver")?;
            let directory = DirectoryResolver::from_csv_path(path)?;
            Arc::new(PacedResolver::new(directory, interval))
        }
    };
    Ok(resolver)
}

fn print_summary(summary: &RunSummary) {
    println!("Run {}", summary.run_id);
    println!("  Total records:        {}", summary.total_records);
    println!("  Updated:              {}", summary.updated);
    println!("  Not updated:          {}", summary.not_updated);
    println!("  Lookup failures:      {}", summary.lookup_failures);
    println!(
        "  Checkpoints written:  {} of {}",
        summary.checkpoints_written.len(),
        summary.batches
    );
    for failure in &summary.checkpoint_failures {
        println!(
            "  Checkpoint failed:    batch {} ({}): {}",
            failure.batch_index,
            failure.path.display(),
            failure.message
        );
    }
    if summary.merge.unmatched_records > 0 || !summary.merge.unmatched_results.is_empty() {
        println!(
            "  Unmatched keys:       {} roster rows, {} results",
            summary.merge.unmatched_records,
            summary.merge.unmatched_results.len()
        );
    }
    println!("  Output:               {}", summary.output_path.display());
    println!("  Duration:             {} ms", summary.duration_ms());
}
