//! # Pipeline Orchestrator
//!
//! Drives one enrichment run end to end:
//!
//! 1. Load the roster and validate its schema
//! 2. Partition it into batches
//! 3. For each batch in order: resolve every record, append the results to
//!    the run's log, and checkpoint the whole log
//! 4. Merge the log onto the roster and write the final table
//!
//! The [`RunStateMachine`] guards the sequencing. Lookup failures become error
//! rows and checkpoint write failures are recorded on the report; neither stops
//! the run. Schema errors, final write errors and cancellation do, moving the
//! run to `Failed`.

use super::batch_processor::{BatchOutcome, BatchProcessor};
use super::batcher::{partition, Batch};
use super::cancellation::CancellationFlag;
use super::checkpoint_writer::CheckpointWriter;
use super::merger::{merge, MergeOutcome};
use super::result_log::ResultLog;
use super::run_reporter::RunReporter;
use super::types::{RunReport, RunSummary};
use crate::config::EnricherConfig;
use crate::error::{PipelineError, Result};
use crate::ingestion::RosterLoader;
use crate::models::Roster;
use crate::resolver::AddressResolver;
use crate::state_machine::{RunEvent, RunStateMachine};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub struct EnrichmentPipeline {
    loader: RosterLoader,
    processor: BatchProcessor,
    checkpoints: CheckpointWriter,
    batch_size: usize,
    cancellation: CancellationFlag,
}

impl EnrichmentPipeline {
    /// Build a pipeline from validated configuration and a resolver
    pub fn new(config: &EnricherConfig, resolver: Arc<dyn AddressResolver>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            loader: RosterLoader::new(config.columns.clone()),
            processor: BatchProcessor::new(resolver, config.pipeline.lookup_concurrency),
            checkpoints: CheckpointWriter::new(config.pipeline.interim_suffix.clone()),
            batch_size: config.pipeline.batch_size,
            cancellation: CancellationFlag::new(),
        })
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn cancellation(&self) -> CancellationFlag {
        self.cancellation.clone()
    }

    pub fn checkpoint_writer(&self) -> &CheckpointWriter {
        &self.checkpoints
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Load `input` and run the pipeline, writing the final table to `output`
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunReport> {
        let reporter = RunReporter::new();
        info!(
            run_id = %reporter.run_id(),
            input = %input.display(),
            resolver = self.processor.resolver_name(),
            "Loading facility roster"
        );

        let roster = match self.loader.load_path(input) {
            Ok(roster) => roster,
            Err(error) => {
                reporter.run_failed(&error.to_string());
                return Err(error);
            }
        };
        self.execute(&roster, output, reporter).await
    }

    /// Run the pipeline over an already loaded roster
    pub async fn run_roster(&self, roster: &Roster, output: &Path) -> Result<RunReport> {
        self.execute(roster, output, RunReporter::new()).await
    }

    async fn execute(
        &self,
        roster: &Roster,
        output: &Path,
        reporter: RunReporter,
    ) -> Result<RunReport> {
        let started_at = Utc::now();
        let batches = partition(roster.records(), self.batch_size)?;
        let mut machine = RunStateMachine::new(batches.len());
        let mut log = ResultLog::new();

        reporter.run_started(roster.len(), batches.len(), output);

        let outcome = match self
            .drive(roster, &batches, output, &reporter, &mut machine, &mut log)
            .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                Self::abort(&mut machine, &reporter, &error);
                return Err(error);
            }
        };

        let counters = reporter.snapshot();
        let updated = outcome.table.updated_count();
        let not_updated = outcome.table.not_updated_count();
        reporter.run_completed(output, updated, not_updated);

        Ok(RunReport {
            summary: RunSummary {
                run_id: reporter.run_id(),
                output_path: output.to_path_buf(),
                total_records: roster.len(),
                updated,
                not_updated,
                lookup_failures: log.failure_count(),
                batches: batches.len(),
                checkpoints_written: counters.checkpoints_written,
                checkpoint_failures: counters.checkpoint_failures,
                merge: outcome.stats,
                started_at,
                completed_at: Utc::now(),
            },
            transitions: machine.history().to_vec(),
            results: log.into_inner(),
            table: outcome.table,
        })
    }

    async fn drive(
        &self,
        roster: &Roster,
        batches: &[Batch<'_>],
        output: &Path,
        reporter: &RunReporter,
        machine: &mut RunStateMachine,
        log: &mut ResultLog,
    ) -> Result<MergeOutcome> {
        let mut last_checkpoint: Option<PathBuf> = None;

        for batch in batches {
            if self.cancellation.is_cancelled() {
                return Err(PipelineError::Cancelled { last_checkpoint });
            }

            machine.transition(RunEvent::StartBatch(batch.index))?;
            reporter.batch_started(batch.index, batches.len(), batch.len());

            let results = match self
                .processor
                .process(batch, reporter, &self.cancellation)
                .await
            {
                BatchOutcome::Completed(results) => results,
                BatchOutcome::Cancelled { resolved } => {
                    warn!(
                        run_id = %reporter.run_id(),
                        batch_index = batch.index,
                        discarded = resolved,
                        "Cancelled mid-batch; partial batch results discarded"
                    );
                    return Err(PipelineError::Cancelled { last_checkpoint });
                }
            };
            log.append_batch(results);

            // Failures are recorded by the reporter and do not stop the run
            if let Ok(path) = self
                .checkpoints
                .flush(log.snapshot(), batch.index, output, reporter)
            {
                last_checkpoint = Some(path);
            }

            machine.transition(RunEvent::CompleteBatch(batch.index))?;
            reporter.batch_completed(batch.index, batches.len(), batch.len());
        }

        machine.transition(RunEvent::BeginMerge)?;
        let outcome = merge(roster, log.snapshot());
        reporter.merge_completed(&outcome.stats);

        outcome
            .table
            .write_csv(output)
            .map_err(|source| PipelineError::FinalWrite {
                path: output.to_path_buf(),
                source,
            })?;

        machine.transition(RunEvent::Finish)?;
        Ok(outcome)
    }

    fn abort(machine: &mut RunStateMachine, reporter: &RunReporter, error: &PipelineError) {
        let message = error.to_string();
        if let Err(e) = machine.transition(RunEvent::fail_with_error(message.clone())) {
            warn!(
                run_id = %reporter.run_id(),
                phase = %machine.current_state(),
                error = %e,
                "Could not record failed phase"
            );
        }
        reporter.run_failed(&message);
    }
}
