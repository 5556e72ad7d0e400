//! # Run State Machine
//!
//! Tracks the phase of one enrichment run and rejects out-of-order batch
//! processing, premature merges and transitions out of terminal phases.

pub mod errors;
pub mod events;
pub mod guards;
pub mod run_state_machine;
pub mod states;

pub use errors::{GuardError, StateMachineError, StateMachineResult};
pub use events::RunEvent;
pub use run_state_machine::{RunStateMachine, TransitionRecord};
pub use states::RunPhase;
