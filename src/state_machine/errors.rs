use thiserror::Error;

/// Error types for run state machine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Guard condition failed: {0}")]
    GuardFailed(#[from] GuardError),

    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },
}

/// Guard condition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("Batch {actual} started out of order, expected batch {expected}")]
    OutOfOrderBatch { expected: usize, actual: usize },

    #[error("Batch {actual} completed while batch {expected} is processing")]
    MismatchedBatch { expected: usize, actual: usize },

    #[error("Batch {batch} exceeds planned batch count {total}")]
    BatchOutOfRange { batch: usize, total: usize },

    #[error("Merge requested after {completed} of {total} batches")]
    BatchesOutstanding { completed: usize, total: usize },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type GuardResult<T> = Result<T, GuardError>;
