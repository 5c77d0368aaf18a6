//! Per-cycle progress events.
//!
//! The controller hands each event to an observer and keeps nothing; any
//! history lives with the observer (log lines, terminal output).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Verdict, VerdictSource};

/// Outcome of one generate/validate cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationEvent {
    /// 1-based generation cycle number
    pub cycle: u32,

    /// Rejection count after this cycle's verdict
    pub iteration: u32,

    /// Who produced the verdict
    pub source: VerdictSource,

    pub accepted: bool,

    pub feedback: String,

    /// Candidate text judged in this cycle
    pub content: String,

    pub timestamp: DateTime<Utc>,

    /// Wall time of the cycle, generation included
    pub duration_ms: u64,
}

impl IterationEvent {
    pub fn new(
        cycle: u32,
        iteration: u32,
        source: VerdictSource,
        verdict: &Verdict,
        content: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            cycle,
            iteration,
            source,
            accepted: verdict.accepted,
            feedback: verdict.feedback.clone(),
            content: content.into(),
            timestamp: Utc::now(),
            duration_ms,
        }
    }

    /// Whether the evaluator was skipped for this cycle.
    pub fn short_circuited(&self) -> bool {
        self.source == VerdictSource::PreFilter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_rejection() {
        let verdict = Verdict::reject("Emoji count is not 1.");
        let event = IterationEvent::new(1, 1, VerdictSource::PreFilter, &verdict, "Buy now!", 12);

        assert_eq!(event.cycle, 1);
        assert_eq!(event.iteration, 1);
        assert!(!event.accepted);
        assert_eq!(event.feedback, "Emoji count is not 1.");
        assert!(event.short_circuited());
    }

    #[test]
    fn test_event_serializes_source_snake_case() {
        let event = IterationEvent::new(2, 1, VerdictSource::Evaluator, &Verdict::accept(), "Hi 🎉", 5);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["source"], "evaluator");
        assert_eq!(value["accepted"], true);
        assert!(value["timestamp"].is_string());
    }
}
