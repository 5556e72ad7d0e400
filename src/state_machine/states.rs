use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one enrichment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "batch", rename_all = "snake_case")]
pub enum RunPhase {
    /// Input parsed and schema-checked, nothing processed yet
    #[default]
    Loaded,
    /// Resolving the records of the given 1-based batch
    Processing(usize),
    /// Checkpoint for the given batch written (or its failure recorded)
    Checkpointed(usize),
    /// Joining the accumulated results onto the roster
    Merging,
    /// Final table written
    Done,
    /// Run terminated by an unrecoverable error
    Failed,
}

impl RunPhase {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Index of the batch this phase refers to, if any
    pub fn batch(&self) -> Option<usize> {
        match self {
            Self::Processing(batch) | Self::Checkpointed(batch) => Some(*batch),
            _ => None,
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Processing(batch) => write!(f, "processing({batch})"),
            Self::Checkpointed(batch) => write!(f, "checkpointed({batch})"),
            Self::Merging => write!(f, "merging"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
