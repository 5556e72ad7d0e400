use serde::{Deserialize, Serialize};

/// Events that drive run phase transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum RunEvent {
    /// Begin resolving the given 1-based batch
    StartBatch(usize),
    /// All records of the batch resolved and its checkpoint flush attempted
    CompleteBatch(usize),
    /// Every batch done; join results onto the roster
    BeginMerge,
    /// Final table persisted
    Finish,
    /// Unrecoverable error
    Fail(String),
}

impl RunEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StartBatch(_) => "start_batch",
            Self::CompleteBatch(_) => "complete_batch",
            Self::BeginMerge => "begin_merge",
            Self::Finish => "finish",
            Self::Fail(_) => "fail",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Fail(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }
}
