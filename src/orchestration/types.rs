//! # Run Report Types
//!
//! What a finished run hands back to its caller: a serializable summary for
//! operators plus the full result log and final table for programmatic use.

use super::merger::MergeStats;
use super::run_reporter::CheckpointFailure;
use crate::models::{FinalTable, ResultRecord};
use crate::state_machine::TransitionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Operator-facing outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub output_path: PathBuf,
    pub total_records: usize,
    /// Rows whose lookup succeeded
    pub updated: usize,
    pub not_updated: usize,
    pub lookup_failures: usize,
    pub batches: usize,
    pub checkpoints_written: Vec<PathBuf>,
    pub checkpoint_failures: Vec<CheckpointFailure>,
    pub merge: MergeStats,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn last_checkpoint(&self) -> Option<&PathBuf> {
        self.checkpoints_written.last()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Phase transitions in the order they were applied
    pub transitions: Vec<TransitionRecord>,
    /// Every result in roster order, as written to the last checkpoint
    pub results: Vec<ResultRecord>,
    pub table: FinalTable,
}
