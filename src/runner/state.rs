//! Loop state owned by the controller for the lifetime of one run.

use std::time::Instant;

use crate::domain::{Candidate, ProductInput, Verdict};
use crate::error::{AdLoopError, Result};

/// Controller phases.
///
/// `Generating → Filtering → (Evaluating | SkipEval) → Deciding → {Generating | Terminated}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Generating,
    Filtering,
    /// Pre-filter failed with these violations; a local rejection is
    /// recorded and the evaluator is skipped
    SkipEval { violations: Vec<String> },
    Evaluating,
    Deciding,
    Terminated,
}

impl LoopPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopPhase::Terminated)
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The last verdict accepted the candidate
    Accepted,
    /// The rejection count reached the iteration cap
    IterationCapReached,
}

/// Mutable state of a single run.
///
/// Holds only the current candidate and the most recent verdict; earlier
/// ones are dropped as soon as they are replaced.
#[derive(Debug, Clone)]
pub struct LoopState {
    pub(crate) iteration: u32,
    pub(crate) product: ProductInput,
    pub(crate) last_candidate: Option<Candidate>,
    pub(crate) last_verdict: Option<Verdict>,
    pub(crate) phase: LoopPhase,
    pub(crate) termination: Option<Termination>,
    pub(crate) cycle_started: Option<Instant>,
}

impl LoopState {
    /// Initial state: `Generating` with `iteration = 0`.
    pub fn new(product: ProductInput) -> Self {
        Self {
            iteration: 0,
            product,
            last_candidate: None,
            last_verdict: None,
            phase: LoopPhase::Generating,
            termination: None,
            cycle_started: None,
        }
    }

    /// Number of rejections so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn product(&self) -> &ProductInput {
        &self.product
    }

    pub fn last_candidate(&self) -> Option<&Candidate> {
        self.last_candidate.as_ref()
    }

    pub fn last_verdict(&self) -> Option<&Verdict> {
        self.last_verdict.as_ref()
    }

    pub fn phase(&self) -> &LoopPhase {
        &self.phase
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Feedback for the next generation call: the last verdict, only if it was a rejection.
    pub fn pending_feedback(&self) -> Option<&Verdict> {
        self.last_verdict.as_ref().filter(|v| v.is_rejection())
    }

    /// Record a verdict for the current candidate; rejections advance the counter.
    pub(crate) fn record_verdict(&mut self, verdict: Verdict) {
        if verdict.is_rejection() {
            self.iteration += 1;
        }
        self.last_verdict = Some(verdict);
    }

    pub(crate) fn current_candidate(&self) -> Result<&Candidate> {
        self.last_candidate.as_ref().ok_or_else(|| {
            AdLoopError::InvalidState(format!("no candidate in phase {:?}", self.phase))
        })
    }

    pub(crate) fn current_verdict(&self) -> Result<&Verdict> {
        self.last_verdict.as_ref().ok_or_else(|| {
            AdLoopError::InvalidState(format!("no verdict in phase {:?}", self.phase))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> LoopState {
        LoopState::new(ProductInput::new("Neon", "Energy drink", "Gen-Z Gamers").unwrap())
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.iteration(), 0);
        assert_eq!(state.phase(), &LoopPhase::Generating);
        assert!(state.last_candidate().is_none());
        assert!(state.last_verdict().is_none());
        assert!(state.pending_feedback().is_none());
        assert!(state.termination().is_none());
    }

    #[test]
    fn test_record_rejection_increments() {
        let mut state = state();
        state.record_verdict(Verdict::reject("too long"));
        assert_eq!(state.iteration(), 1);
        assert_eq!(state.pending_feedback().unwrap().feedback, "too long");
    }

    #[test]
    fn test_record_acceptance_does_not_increment() {
        let mut state = state();
        state.record_verdict(Verdict::reject("too long"));
        state.record_verdict(Verdict::accept());
        assert_eq!(state.iteration(), 1);
        assert!(state.pending_feedback().is_none());
    }

    #[test]
    fn test_only_latest_verdict_is_kept() {
        let mut state = state();
        state.record_verdict(Verdict::reject("first"));
        state.record_verdict(Verdict::reject("second"));
        assert_eq!(state.last_verdict().unwrap().feedback, "second");
    }

    #[test]
    fn test_missing_candidate_is_invalid_state() {
        let err = state().current_candidate().unwrap_err();
        assert!(matches!(err, AdLoopError::InvalidState(_)));
    }

    #[test]
    fn test_terminal_phase() {
        assert!(LoopPhase::Terminated.is_terminal());
        assert!(!LoopPhase::Deciding.is_terminal());
    }
}
