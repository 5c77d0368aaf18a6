//! Loop runner module - drives a product through generate/validate/retry.
//!
//! - LoopController for executing a run
//! - LoopState and LoopPhase for the state machine
//! - IterationEvent for per-cycle progress

mod event;
mod loop_runner;
mod state;

pub use event::IterationEvent;
pub use loop_runner::{DEFAULT_MAX_ITERATIONS, LoopConfig, LoopController, RunOutcome};
pub use state::{LoopPhase, LoopState, Termination};
