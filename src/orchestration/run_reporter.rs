//! # Run Reporter
//!
//! Operational visibility for one run. Every component that does observable
//! work receives the reporter and emits its events through it, so all log
//! lines of a run carry the same `run_id` and the counters in the final report
//! agree with what was logged.

use super::merger::MergeStats;
use crate::constants::events;
use crate::logging::{log_batch_operation, log_checkpoint_operation, log_error};
use crate::models::FacilityRecord;
use crate::resolver::LookupOutcome;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A checkpoint that could not be written; the run continued past it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointFailure {
    pub batch_index: usize,
    pub path: PathBuf,
    pub message: String,
}

/// Counters accumulated while the run progresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub lookups_succeeded: usize,
    pub lookups_failed: usize,
    pub batches_completed: usize,
    pub checkpoints_written: Vec<PathBuf>,
    pub checkpoint_failures: Vec<CheckpointFailure>,
}

#[derive(Debug)]
pub struct RunReporter {
    run_id: Uuid,
    counters: Mutex<RunCounters>,
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            counters: Mutex::new(RunCounters::default()),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn snapshot(&self) -> RunCounters {
        self.counters.lock().clone()
    }

    pub fn run_started(&self, total_records: usize, total_batches: usize, output: &Path) {
        info!(
            event = events::RUN_STARTED,
            run_id = %self.run_id,
            total_records = total_records,
            total_batches = total_batches,
            output = %output.display(),
            "Enrichment run started"
        );
    }

    pub fn batch_started(&self, batch_index: usize, total_batches: usize, records: usize) {
        log_batch_operation(
            events::BATCH_STARTED,
            &self.run_id.to_string(),
            batch_index,
            total_batches,
            records,
            None,
        );
    }

    pub fn batch_completed(&self, batch_index: usize, total_batches: usize, records: usize) {
        let failed = {
            let mut counters = self.counters.lock();
            counters.batches_completed += 1;
            counters.lookups_failed
        };
        log_batch_operation(
            events::BATCH_COMPLETED,
            &self.run_id.to_string(),
            batch_index,
            total_batches,
            records,
            Some(&format!("{failed} lookup failures so far")),
        );
    }

    pub fn lookup_completed(&self, record: &FacilityRecord, outcome: &LookupOutcome) {
        match outcome {
            LookupOutcome::Success(address) => {
                self.counters.lock().lookups_succeeded += 1;
                debug!(
                    event = events::LOOKUP_COMPLETED,
                    run_id = %self.run_id,
                    id = %record.id,
                    facility = %record.facility_name,
                    found = !address.is_empty(),
                    "Lookup completed"
                );
            }
            LookupOutcome::Failure { reason } => {
                self.counters.lock().lookups_failed += 1;
                warn!(
                    event = events::LOOKUP_FAILED,
                    run_id = %self.run_id,
                    id = %record.id,
                    facility = %record.facility_name,
                    reason = %reason,
                    "Lookup failed"
                );
            }
        }
    }

    pub fn checkpoint_written(&self, batch_index: usize, path: &Path, rows: usize) {
        self.counters
            .lock()
            .checkpoints_written
            .push(path.to_path_buf());
        log_checkpoint_operation(
            events::CHECKPOINT_WRITTEN,
            &self.run_id.to_string(),
            batch_index,
            path,
            rows,
            "written",
        );
    }

    pub fn checkpoint_failed(&self, batch_index: usize, path: &Path, message: &str) {
        self.counters.lock().checkpoint_failures.push(CheckpointFailure {
            batch_index,
            path: path.to_path_buf(),
            message: message.to_string(),
        });
        warn!(
            event = events::CHECKPOINT_FAILED,
            run_id = %self.run_id,
            batch_index = batch_index,
            path = %path.display(),
            error = %message,
            "Checkpoint write failed; continuing"
        );
    }

    pub fn merge_completed(&self, stats: &MergeStats) {
        info!(
            event = events::MERGE_COMPLETED,
            run_id = %self.run_id,
            matched = stats.matched,
            unmatched_records = stats.unmatched_records,
            unmatched_results = stats.unmatched_results.len(),
            duplicate_results = stats.duplicate_results,
            "Results merged into roster"
        );
        if !stats.unmatched_results.is_empty() {
            warn!(
                run_id = %self.run_id,
                ids = ?stats.unmatched_results,
                "Results without a matching roster row were dropped"
            );
        }
    }

    pub fn run_completed(&self, output: &Path, updated: usize, not_updated: usize) {
        info!(
            event = events::RUN_COMPLETED,
            run_id = %self.run_id,
            output = %output.display(),
            updated = updated,
            not_updated = not_updated,
            "Enrichment run completed"
        );
    }

    pub fn run_failed(&self, error: &str) {
        log_error(
            "pipeline",
            events::RUN_FAILED,
            error,
            Some(&format!("run_id={}", self.run_id)),
        );
    }
}
