//! # Structured Logging Module
//!
//! Environment-aware structured logging for enrichment runs. Console output is
//! pretty or JSON per configuration; an optional file mirror always writes JSON
//! so runs can be audited after the fact.

use crate::config::{LogFormat, LoggingConfig};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize structured logging. Subsequent calls are no-ops, as is the case
/// where another global subscriber is already installed.
pub fn init_structured_logging(config: &LoggingConfig, environment: &str) -> io::Result<()> {
    if LOGGER_INITIALIZED.get().is_some() {
        return Ok(());
    }

    let directive = filter_directive(config, environment);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .with_filter(EnvFilter::new(&directive))
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(EnvFilter::new(&directive))
            .boxed(),
    };
    layers.push(console);

    if let Some(path) = &config.file {
        let file = open_log_file(path)?;
        layers.push(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new(&directive))
                .boxed(),
        );
    }

    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
    }
    let _ = LOGGER_INITIALIZED.set(());

    tracing::info!(
        pid = std::process::id(),
        environment = %environment,
        filter = %directive,
        log_file = config.file.as_ref().map(|p| p.display().to_string()),
        "Structured logging initialized"
    );
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `RUST_LOG` wins, then the configured level, then the environment default
fn filter_directive(config: &LoggingConfig, environment: &str) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.level.clone())
        .unwrap_or_else(|| get_log_level(environment).to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "test" => "debug",
        "development" => "debug",
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for batch operations
pub fn log_batch_operation(
    operation: &str,
    run_id: &str,
    batch_index: usize,
    total_batches: usize,
    records: usize,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        run_id = %run_id,
        batch_index = batch_index,
        total_batches = total_batches,
        records = records,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "BATCH_OPERATION"
    );
}

/// Log structured data for checkpoint operations
pub fn log_checkpoint_operation(
    operation: &str,
    run_id: &str,
    batch_index: usize,
    path: &Path,
    rows: usize,
    status: &str,
) {
    tracing::info!(
        operation = %operation,
        run_id = %run_id,
        batch_index = batch_index,
        path = %path.display(),
        rows = rows,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "CHECKPOINT_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
