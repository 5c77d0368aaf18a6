//! Accept/reject decision for a candidate.

use serde::{Deserialize, Serialize};

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Synthesized locally by the deterministic pre-filter
    PreFilter,
    /// Returned by the external quality evaluator
    Evaluator,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::PreFilter => "pre-filter",
            VerdictSource::Evaluator => "evaluator",
        }
    }
}

impl std::fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A verdict on one candidate. `feedback` is empty only on acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    pub feedback: String,
}

impl Verdict {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            feedback: String::new(),
        }
    }

    pub fn reject(feedback: impl Into<String>) -> Self {
        Self {
            accepted: false,
            feedback: feedback.into(),
        }
    }

    pub fn is_rejection(&self) -> bool {
        !self.accepted
    }
}
