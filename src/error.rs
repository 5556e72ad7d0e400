use crate::config::ConfigurationError;
use crate::state_machine::StateMachineError;
use crate::utils::WriteError;
use std::path::PathBuf;
use thiserror::Error;

/// Run-terminating errors. Per-record lookup failures and interim checkpoint
/// failures are recorded on the run report instead and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Failed to read input '{}': {reason}", path.display())]
    InputRead { path: PathBuf, reason: String },

    #[error("Failed to write final output '{}': {source}", path.display())]
    FinalWrite {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    #[error("Run cancelled; last checkpoint: {}", last_checkpoint.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "none".to_string()))]
    Cancelled { last_checkpoint: Option<PathBuf> },

    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

impl PipelineError {
    pub fn invalid_batch_size(size: usize) -> Self {
        Self::Configuration(ConfigurationError::invalid_value(
            "batch_size",
            size.to_string(),
            "batch size must be at least 1",
        ))
    }

    pub fn input_read<P: Into<PathBuf>, E: std::fmt::Display>(path: P, error: E) -> Self {
        Self::InputRead {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Process exit code for the command surface
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled { .. } => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
