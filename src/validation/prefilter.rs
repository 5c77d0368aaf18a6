//! Deterministic pre-filter.
//!
//! Cheap local checks that can reject a candidate without calling the
//! external evaluator. Pure: the same candidate always yields the same
//! violations, in the same order.

use log::debug;

use crate::domain::{Candidate, Verdict};
use crate::validation::metrics::{emoji_count, word_count};

/// Thresholds for the pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreFilterRules {
    /// Fail when the word count exceeds this
    pub max_words: usize,
    /// Fail unless the emoji count equals this exactly
    pub required_emojis: usize,
}

impl Default for PreFilterRules {
    fn default() -> Self {
        Self {
            max_words: 15,
            required_emojis: 1,
        }
    }
}

/// Word-count and emoji-count checks.
#[derive(Debug, Clone, Default)]
pub struct PreFilter {
    rules: PreFilterRules,
}

impl PreFilter {
    pub fn new(rules: PreFilterRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> PreFilterRules {
        self.rules
    }

    /// Ordered violations for `candidate`; empty means pass.
    ///
    /// The word-count violation always precedes the emoji violation.
    pub fn check(&self, candidate: &Candidate) -> Vec<String> {
        let words = word_count(&candidate.text);
        let emojis = emoji_count(&candidate.text);
        debug!("pre-filter: words={} emojis={}", words, emojis);

        let mut violations = Vec::new();
        if words > self.rules.max_words {
            violations.push(format!("Word count is more than {}.", self.rules.max_words));
        }
        if emojis != self.rules.required_emojis {
            violations.push(format!("Emoji count is not {}.", self.rules.required_emojis));
        }
        violations
    }
}

/// Synthetic rejection carrying every violation, so the generator sees
/// all issues at once.
pub fn rejection(violations: &[String]) -> Verdict {
    Verdict::reject(join_violations(violations))
}

/// Join violations into a single human-readable feedback string.
fn join_violations(violations: &[String]) -> String {
    violations.join(" ")
}
