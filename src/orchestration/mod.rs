//! # Enrichment Orchestration
//!
//! The batch pipeline that refreshes facility addresses.
//!
//! ## Components
//!
//! - **Batcher**: splits the roster into fixed-size, 1-indexed batches
//! - **BatchProcessor**: resolves each record of a batch through an
//!   [`AddressResolver`](crate::resolver::AddressResolver), sequentially or
//!   with bounded, order-preserving concurrency
//! - **ResultLog**: append-only run state holding every result so far
//! - **CheckpointWriter**: atomically persists the cumulative log after every
//!   batch; a failed write is recorded and the run goes on
//! - **Merger**: left-joins the results onto the roster by id
//! - **RunReporter**: per-run structured logging and counters
//! - **EnrichmentPipeline**: drives the above under the run state machine

pub mod batch_processor;
pub mod batcher;
pub mod cancellation;
pub mod checkpoint_writer;
pub mod merger;
pub mod pipeline_orchestrator;
pub mod result_log;
pub mod run_reporter;
pub mod types;

pub use batch_processor::{BatchOutcome, BatchProcessor};
pub use batcher::{batch_count, partition, Batch};
pub use cancellation::CancellationFlag;
pub use checkpoint_writer::{CheckpointReadError, CheckpointWriteError, CheckpointWriter};
pub use merger::{merge, MergeOutcome, MergeStats};
pub use pipeline_orchestrator::EnrichmentPipeline;
pub use result_log::ResultLog;
pub use run_reporter::{CheckpointFailure, RunCounters, RunReporter};
pub use types::{RunReport, RunSummary};
