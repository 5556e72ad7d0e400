use super::{
    errors::{StateMachineError, StateMachineResult},
    events::RunEvent,
    guards,
    states::RunPhase,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One applied transition, kept for the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: RunPhase,
    pub to: RunPhase,
    pub event: String,
    pub at: DateTime<Utc>,
}

/// In-memory state machine for one enrichment run.
///
/// `Loaded → (Processing(k) → Checkpointed(k))* → Merging → Done`, with
/// `Failed` reachable from every non-terminal phase.
#[derive(Debug)]
pub struct RunStateMachine {
    current: RunPhase,
    total_batches: usize,
    history: Vec<TransitionRecord>,
}

impl RunStateMachine {
    pub fn new(total_batches: usize) -> Self {
        Self {
            current: RunPhase::default(),
            total_batches,
            history: Vec::new(),
        }
    }

    pub fn current_state(&self) -> RunPhase {
        self.current
    }

    pub fn total_batches(&self) -> usize {
        self.total_batches
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Number of batches that reached `Checkpointed`
    pub fn completed_batches(&self) -> usize {
        match self.current {
            RunPhase::Loaded => 0,
            RunPhase::Processing(batch) => batch - 1,
            RunPhase::Checkpointed(batch) => batch,
            RunPhase::Merging | RunPhase::Done => self.total_batches,
            RunPhase::Failed => self
                .history
                .iter()
                .rev()
                .find_map(|t| match t.to {
                    RunPhase::Checkpointed(batch) => Some(batch),
                    _ => None,
                })
                .unwrap_or(0),
        }
    }

    /// Attempt to transition the run
    pub fn transition(&mut self, event: RunEvent) -> StateMachineResult<RunPhase> {
        let from = self.current;
        let target = self.determine_target_state(from, &event)?;

        debug!(
            from = %from,
            to = %target,
            event = event.event_type(),
            "Run phase transition"
        );

        self.history.push(TransitionRecord {
            from,
            to: target,
            event: event.event_type().to_string(),
            at: Utc::now(),
        });
        self.current = target;

        Ok(target)
    }

    /// Determine the target state based on current state and event, checking
    /// the sequencing guards
    fn determine_target_state(
        &self,
        current_state: RunPhase,
        event: &RunEvent,
    ) -> StateMachineResult<RunPhase> {
        let target = match (current_state, event) {
            (RunPhase::Loaded, RunEvent::StartBatch(batch)) => {
                guards::check_next_batch(0, *batch, self.total_batches)?;
                RunPhase::Processing(*batch)
            }
            (RunPhase::Checkpointed(last), RunEvent::StartBatch(batch)) => {
                guards::check_next_batch(last, *batch, self.total_batches)?;
                RunPhase::Processing(*batch)
            }

            (RunPhase::Processing(processing), RunEvent::CompleteBatch(batch)) => {
                guards::check_completing_batch(processing, *batch)?;
                RunPhase::Checkpointed(*batch)
            }

            (RunPhase::Loaded, RunEvent::BeginMerge) => {
                guards::check_all_batches_complete(0, self.total_batches)?;
                RunPhase::Merging
            }
            (RunPhase::Checkpointed(last), RunEvent::BeginMerge) => {
                guards::check_all_batches_complete(last, self.total_batches)?;
                RunPhase::Merging
            }

            (RunPhase::Merging, RunEvent::Finish) => RunPhase::Done,

            (from_state, RunEvent::Fail(_)) if !from_state.is_terminal() => RunPhase::Failed,

            (from_state, _) => {
                return Err(StateMachineError::InvalidTransition {
                    from: from_state.to_string(),
                    event: format!("{event:?}"),
                })
            }
        };

        Ok(target)
    }
}
