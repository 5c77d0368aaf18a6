//! Quality evaluation - LLM-as-judge for the rules the pre-filter cannot check.
//!
//! The evaluator is an untrusted oracle: the same candidate may get a
//! different verdict on a different call. Callers must not cache or assume
//! idempotence. Only the structure of its answer is checked here.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::domain::{Candidate, Verdict};
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient, parse_response_payload};
use crate::prompt::{CRITIC_SYSTEM, critic_directive};
use crate::validation::PreFilterRules;

/// Feedback substituted when the evaluator rejects without saying why.
pub const MISSING_FEEDBACK: &str = "Rejected by the quality evaluator without feedback.";

/// Judges a candidate against safety, accuracy and tone rules.
#[async_trait]
pub trait QualityEvaluator: Send + Sync {
    /// Evaluate a candidate that already passed the pre-filter.
    async fn evaluate(&self, candidate: &Candidate) -> Result<Verdict>;
}

/// Evaluator backed by an LLM critic.
pub struct LlmEvaluator {
    client: Arc<dyn LlmClient>,
    rules: PreFilterRules,
    max_tokens: u32,
}

impl LlmEvaluator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            rules: PreFilterRules::default(),
            max_tokens: 500,
        }
    }

    /// Use these thresholds when rendering the critic directive.
    pub fn with_rules(mut self, rules: PreFilterRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, candidate: &Candidate) -> CompletionRequest {
        CompletionRequest::new(CRITIC_SYSTEM)
            .with_user_message(critic_directive(&candidate.text, &self.rules))
            .with_max_tokens(self.max_tokens)
            .with_json_output()
    }
}

#[async_trait]
impl QualityEvaluator for LlmEvaluator {
    async fn evaluate(&self, candidate: &Candidate) -> Result<Verdict> {
        let response = self.client.complete(self.build_request(candidate)).await?;
        let verdict: Verdict = parse_response_payload(&response, "verdict")?;
        Ok(normalize_verdict(verdict))
    }
}

/// Enforce "feedback is empty only on acceptance" for rejections.
///
/// Non-empty feedback on acceptance is tolerated and passed through.
fn normalize_verdict(verdict: Verdict) -> Verdict {
    if verdict.accepted {
        if !verdict.feedback.trim().is_empty() {
            debug!("evaluator accepted with feedback: {}", verdict.feedback);
        }
        return verdict;
    }

    if verdict.feedback.trim().is_empty() {
        warn!("evaluator rejected without feedback");
        return Verdict::reject(MISSING_FEEDBACK);
    }

    verdict
}
