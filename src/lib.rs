#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Facility Address
//!
//! Batch-resumable refresh of medical facility addresses.
//!
//! ## Overview
//!
//! A roster of facilities is read from CSV, split into fixed-size batches and
//! each facility is looked up through a pluggable [`resolver::AddressResolver`].
//! After every batch the cumulative results are checkpointed next to the final
//! output, so an interrupted run loses at most one batch of work. When all
//! batches are done the results are left-joined onto the original roster and
//! written as the final table.
//!
//! ## Module Organization
//!
//! - [`config`] - YAML configuration with environment overrides
//! - [`ingestion`] - Roster loading and schema validation
//! - [`models`] - Facility records, result records and the final table
//! - [`resolver`] - The address lookup contract and bundled resolvers
//! - [`orchestration`] - Batching, checkpointing, merging and the run driver
//! - [`state_machine`] - Run phase sequencing
//! - [`error`] - Run-terminating errors
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use facility_address::config::EnricherConfig;
//! use facility_address::orchestration::EnrichmentPipeline;
//! use facility_address::resolver::NullResolver;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> facility_address::Result<()> {
//! let pipeline = EnrichmentPipeline::new(&EnricherConfig::default(), Arc::new(NullResolver))?;
//! let report = pipeline
//!     .run(Path::new("data/input/medical_facilities.csv"), Path::new("data/output/updated.csv"))
//!     .await?;
//! println!("updated {} of {}", report.summary.updated, report.summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod resolver;
pub mod state_machine;
pub mod utils;

pub use config::{ConfigManager, EnricherConfig};
pub use error::{PipelineError, Result};
pub use models::{FacilityRecord, FinalTable, ResultRecord, ResultStatus, Roster};
pub use orchestration::{CancellationFlag, EnrichmentPipeline, RunReport, RunSummary};
pub use resolver::{AddressResolver, LookupOutcome};
