//! Loop controller - the generate → validate → retry state machine.
//!
//! Each cycle:
//! 1. Generates a candidate, feeding back the last rejection verbatim
//! 2. Recomputes the candidate's character length locally
//! 3. Runs the pre-filter; on violations, rejects locally and skips the evaluator
//! 4. Otherwise asks the evaluator
//! 5. Stops on acceptance or when the rejection count reaches the cap
//!
//! The last candidate is always returned, accepted or not.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use super::event::IterationEvent;
use super::state::{LoopPhase, LoopState, Termination};
use crate::artifact::OutputArtifact;
use crate::domain::{Candidate, ProductInput, Verdict, VerdictSource};
use crate::error::{AdLoopError, Result};
use crate::generator::ContentGenerator;
use crate::validation::{PreFilter, PreFilterRules, QualityEvaluator, rejection};

/// Default cap on rejections.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Configuration for the LoopController, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Stop once this many rejections have been recorded
    pub max_iterations: u32,
    /// Pre-filter thresholds
    pub rules: PreFilterRules,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rules: PreFilterRules::default(),
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AdLoopError::Config("max_iterations must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Last candidate produced, with a locally computed length
    pub candidate: Candidate,
    /// Verdict on that candidate
    pub verdict: Verdict,
    /// Rejections recorded during the run
    pub iterations: u32,
    pub termination: Termination,
}

impl RunOutcome {
    pub fn accepted(&self) -> bool {
        self.termination == Termination::Accepted
    }

    /// Wrap the final candidate in the output document.
    pub fn artifact(&self) -> OutputArtifact {
        OutputArtifact::new(self.candidate.clone())
    }
}

/// Drives one run from product input to final candidate.
pub struct LoopController<G, E>
where
    G: ContentGenerator,
    E: QualityEvaluator,
{
    generator: Arc<G>,
    evaluator: Arc<E>,
    prefilter: PreFilter,
    config: LoopConfig,
}

impl<G, E> LoopController<G, E>
where
    G: ContentGenerator,
    E: QualityEvaluator,
{
    /// Create a controller with the default configuration.
    pub fn new(generator: Arc<G>, evaluator: Arc<E>) -> Self {
        Self::with_config(generator, evaluator, LoopConfig::default())
    }

    /// Create a controller with a custom configuration.
    pub fn with_config(generator: Arc<G>, evaluator: Arc<E>, config: LoopConfig) -> Self {
        Self {
            generator,
            evaluator,
            prefilter: PreFilter::new(config.rules),
            config,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run to termination.
    pub async fn run(&self, product: ProductInput) -> Result<RunOutcome> {
        self.run_with_observer(product, |_| {}).await
    }

    /// Run to termination, reporting each completed cycle to `observer`.
    ///
    /// Any generator or evaluator failure aborts the run; the failed call is
    /// not retried.
    pub async fn run_with_observer<F>(&self, product: ProductInput, mut observer: F) -> Result<RunOutcome>
    where
        F: FnMut(&IterationEvent),
    {
        self.config.validate()?;

        let mut state = LoopState::new(product);
        while !state.phase.is_terminal() {
            self.step(&mut state, &mut observer).await?;
        }

        Self::finish(state)
    }

    /// Perform exactly one phase transition and return the new phase.
    pub async fn step<F>(&self, state: &mut LoopState, observer: &mut F) -> Result<LoopPhase>
    where
        F: FnMut(&IterationEvent),
    {
        let next = match state.phase.clone() {
            LoopPhase::Generating => {
                state.cycle_started = Some(Instant::now());
                let candidate = self
                    .generator
                    .generate(&state.product, state.pending_feedback())
                    .await?;
                // The generator's own length estimate is never trusted
                state.last_candidate = Some(candidate.with_recomputed_length());
                LoopPhase::Filtering
            }
            LoopPhase::Filtering => {
                let violations = self.prefilter.check(state.current_candidate()?);
                if violations.is_empty() {
                    LoopPhase::Evaluating
                } else {
                    LoopPhase::SkipEval { violations }
                }
            }
            LoopPhase::SkipEval { violations } => {
                self.record(state, rejection(&violations), VerdictSource::PreFilter, observer)?;
                LoopPhase::Deciding
            }
            LoopPhase::Evaluating => {
                let verdict = self.evaluator.evaluate(state.current_candidate()?).await?;
                self.record(state, verdict, VerdictSource::Evaluator, observer)?;
                LoopPhase::Deciding
            }
            LoopPhase::Deciding => {
                // Acceptance wins a tie with the cap
                if state.current_verdict()?.accepted {
                    state.termination = Some(Termination::Accepted);
                    LoopPhase::Terminated
                } else if state.iteration >= self.config.max_iterations {
                    state.termination = Some(Termination::IterationCapReached);
                    LoopPhase::Terminated
                } else {
                    LoopPhase::Generating
                }
            }
            LoopPhase::Terminated => LoopPhase::Terminated,
        };
        debug!("phase -> {:?} (iteration {})", next, state.iteration);
        state.phase = next.clone();
        Ok(next)
    }

    fn record<F>(&self, state: &mut LoopState, verdict: Verdict, source: VerdictSource, observer: &mut F) -> Result<()>
    where
        F: FnMut(&IterationEvent),
    {
        let cycle = state.iteration + 1;
        state.record_verdict(verdict);

        let verdict = state.current_verdict()?;
        info!("Iteration {}: accepted={} ({})", cycle, verdict.accepted, source);
        if !verdict.accepted {
            info!("Feedback: {}", verdict.feedback);
        }

        let duration_ms = state
            .cycle_started
            .map(|started| started.elapsed().as_millis() as u64)
            .unwrap_or(0);
        let event = IterationEvent::new(
            cycle,
            state.iteration,
            source,
            verdict,
            &state.current_candidate()?.text,
            duration_ms,
        );
        observer(&event);
        Ok(())
    }

    fn finish(state: LoopState) -> Result<RunOutcome> {
        let termination = state
            .termination
            .ok_or_else(|| AdLoopError::InvalidState("loop ended without a termination reason".to_string()))?;
        let iterations = state.iteration;
        let candidate = state
            .last_candidate
            .ok_or_else(|| AdLoopError::InvalidState("loop ended without a candidate".to_string()))?;
        let verdict = state
            .last_verdict
            .ok_or_else(|| AdLoopError::InvalidState("loop ended without a verdict".to_string()))?;

        info!("Loop terminated: {:?} after {} rejection(s)", termination, iterations);

        Ok(RunOutcome {
            candidate,
            verdict,
            iterations,
            termination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    const GOOD: &str = "Buy now! 🎉";

    /// Generator that replays scripted texts and records the feedback it was given.
    struct ScriptedGenerator {
        texts: Mutex<VecDeque<String>>,
        reported_length: usize,
        feedback_seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedGenerator {
        fn new(texts: &[&str]) -> Self {
            Self {
                texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
                reported_length: 999,
                feedback_seen: Mutex::new(Vec::new()),
            }
        }

        fn repeating(text: &str, times: usize) -> Self {
            Self::new(&vec![text; times])
        }

        fn feedback_seen(&self) -> Vec<Option<String>> {
            self.feedback_seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, _product: &ProductInput, feedback: Option<&Verdict>) -> Result<Candidate> {
            self.feedback_seen
                .lock()
                .unwrap()
                .push(feedback.map(|v| v.feedback.clone()));

            let text = self
                .texts
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AdLoopError::ExternalCall("script exhausted".to_string()))?;

            let mut candidate = Candidate::new("text_ad", text, "energetic", "passed");
            candidate.metadata.char_length = self.reported_length;
            Ok(candidate)
        }
    }

    /// Evaluator that replays scripted verdicts and counts calls.
    struct ScriptedEvaluator {
        verdicts: Mutex<VecDeque<Verdict>>,
        calls: AtomicU32,
    }

    impl ScriptedEvaluator {
        fn new(verdicts: Vec<Verdict>) -> Self {
            Self {
                verdicts: Mutex::new(verdicts.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QualityEvaluator for ScriptedEvaluator {
        async fn evaluate(&self, _candidate: &Candidate) -> Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdicts
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| AdLoopError::ExternalCall("no verdict scripted".to_string()))
        }
    }

    fn product() -> ProductInput {
        ProductInput::new("Neon", "Energy drink", "Gen-Z Gamers").unwrap()
    }

    fn controller(
        generator: ScriptedGenerator,
        evaluator: ScriptedEvaluator,
    ) -> (
        LoopController<ScriptedGenerator, ScriptedEvaluator>,
        Arc<ScriptedGenerator>,
        Arc<ScriptedEvaluator>,
    ) {
        let generator = Arc::new(generator);
        let evaluator = Arc::new(evaluator);
        (
            LoopController::new(generator.clone(), evaluator.clone()),
            generator,
            evaluator,
        )
    }

    fn twenty_words() -> String {
        vec!["word"; 20].join(" ")
    }

    #[test]
    fn test_loop_config_default() {
        let config = LoopConfig::default();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.rules, PreFilterRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_loop_config_rejects_zero_cap() {
        let config = LoopConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AdLoopError::Config(_))));
    }

    #[tokio::test]
    async fn test_accept_on_first_cycle() {
        let (controller, _, evaluator) = controller(
            ScriptedGenerator::new(&[GOOD]),
            ScriptedEvaluator::new(vec![Verdict::accept()]),
        );

        let outcome = controller.run(product()).await.unwrap();

        assert!(outcome.accepted());
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.candidate.text, GOOD);
        assert_eq!(evaluator.calls(), 1);
    }

    #[tokio::test]
    async fn test_length_is_recomputed() {
        let (controller, _, _) = controller(
            ScriptedGenerator::new(&[GOOD]),
            ScriptedEvaluator::new(vec![Verdict::accept()]),
        );

        let outcome = controller.run(product()).await.unwrap();

        assert_eq!(outcome.candidate.metadata.char_length, 10);
        assert!(outcome.candidate.has_consistent_length());
    }

    #[tokio::test]
    async fn test_prefilter_failure_skips_evaluator() {
        let long = twenty_words();
        let (controller, _, evaluator) = controller(
            ScriptedGenerator::new(&[&long, GOOD]),
            ScriptedEvaluator::new(vec![Verdict::accept()]),
        );

        let mut events = Vec::new();
        let outcome = controller
            .run_with_observer(product(), |e| events.push(e.clone()))
            .await
            .unwrap();

        // Only the second candidate reached the evaluator
        assert_eq!(evaluator.calls(), 1);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(events.len(), 2);
        assert!(events[0].short_circuited());
        assert_eq!(events[0].iteration, 1);
        assert!(events[0].feedback.contains("Word count"));
        assert!(events[0].feedback.contains("Emoji count"));
        assert_eq!(events[1].source, VerdictSource::Evaluator);
    }

    #[tokio::test]
    async fn test_step_sequence_for_prefilter_rejection() {
        let long = twenty_words();
        let (controller, _, evaluator) = controller(
            ScriptedGenerator::new(&[&long]),
            ScriptedEvaluator::new(vec![]),
        );

        let mut state = LoopState::new(product());
        let mut observer = |_: &IterationEvent| {};

        assert_eq!(controller.step(&mut state, &mut observer).await.unwrap(), LoopPhase::Filtering);
        assert_eq!(
            controller.step(&mut state, &mut observer).await.unwrap(),
            LoopPhase::SkipEval {
                violations: vec![
                    "Word count is more than 15.".to_string(),
                    "Emoji count is not 1.".to_string()
                ]
            }
        );
        // Nothing is recorded until the SkipEval step runs
        assert_eq!(state.iteration(), 0);
        assert_eq!(controller.step(&mut state, &mut observer).await.unwrap(), LoopPhase::Deciding);
        assert_eq!(state.iteration(), 1);
        assert_eq!(
            state.last_verdict().unwrap().feedback,
            "Word count is more than 15. Emoji count is not 1."
        );
        assert_eq!(controller.step(&mut state, &mut observer).await.unwrap(), LoopPhase::Generating);
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn test_step_sequence_for_evaluated_acceptance() {
        let (controller, _, _) = controller(
            ScriptedGenerator::new(&[GOOD]),
            ScriptedEvaluator::new(vec![Verdict::accept()]),
        );

        let mut state = LoopState::new(product());
        let mut observer = |_: &IterationEvent| {};
        let mut phases = Vec::new();
        while !state.phase().is_terminal() {
            phases.push(controller.step(&mut state, &mut observer).await.unwrap());
        }

        assert_eq!(
            phases,
            vec![
                LoopPhase::Filtering,
                LoopPhase::Evaluating,
                LoopPhase::Deciding,
                LoopPhase::Terminated
            ]
        );
        assert_eq!(state.termination(), Some(Termination::Accepted));
    }

    #[tokio::test]
    async fn test_cap_reached_returns_last_candidate() {
        let rejections = (0..5).map(|i| Verdict::reject(format!("reject {}", i))).collect();
        let (controller, generator, evaluator) = controller(
            ScriptedGenerator::new(&["One 🎉", "Two 🎉", "Three 🎉", "Four 🎉", "Five 🎉", "Six 🎉"]),
            ScriptedEvaluator::new(rejections),
        );

        let outcome = controller.run(product()).await.unwrap();

        assert_eq!(outcome.termination, Termination::IterationCapReached);
        assert!(!outcome.accepted());
        assert_eq!(outcome.iterations, 5);
        assert_eq!(outcome.candidate.text, "Five 🎉");
        assert_eq!(outcome.verdict.feedback, "reject 4");
        assert_eq!(evaluator.calls(), 5);
        assert_eq!(generator.feedback_seen().len(), 5);
    }

    #[tokio::test]
    async fn test_feedback_propagates_verbatim() {
        let (controller, generator, _) = controller(
            ScriptedGenerator::new(&["no emoji here", "Rule breaker 🎉", GOOD]),
            ScriptedEvaluator::new(vec![
                Verdict::reject("Rule 3: contains health claim 'boosts focus'."),
                Verdict::accept(),
            ]),
        );

        let outcome = controller.run(product()).await.unwrap();
        assert!(outcome.accepted());
        assert_eq!(outcome.iterations, 2);

        assert_eq!(
            generator.feedback_seen(),
            vec![
                None,
                Some("Emoji count is not 1.".to_string()),
                Some("Rule 3: contains health claim 'boosts focus'.".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_iteration_is_monotonic() {
        let rejections = (0..3).map(|_| Verdict::reject("again")).collect::<Vec<_>>();
        let mut verdicts = rejections;
        verdicts.push(Verdict::accept());
        let (controller, _, _) = controller(
            ScriptedGenerator::repeating(GOOD, 4),
            ScriptedEvaluator::new(verdicts),
        );

        let mut seen = Vec::new();
        let outcome = controller
            .run_with_observer(product(), |e| seen.push(e.iteration))
            .await
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 3]);
        assert_eq!(outcome.iterations, 3);
    }

    #[tokio::test]
    async fn test_custom_cap() {
        let config = LoopConfig {
            max_iterations: 2,
            ..Default::default()
        };
        let generator = Arc::new(ScriptedGenerator::repeating("no emoji", 5));
        let evaluator = Arc::new(ScriptedEvaluator::new(vec![]));
        let controller = LoopController::with_config(generator.clone(), evaluator.clone(), config);

        let outcome = controller.run(product()).await.unwrap();

        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.termination, Termination::IterationCapReached);
        assert_eq!(generator.feedback_seen().len(), 2);
        assert_eq!(evaluator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generator_failure_aborts() {
        let (controller, _, _) = controller(ScriptedGenerator::new(&[]), ScriptedEvaluator::new(vec![]));

        let err = controller.run(product()).await.unwrap_err();
        assert!(matches!(err, AdLoopError::ExternalCall(_)));
    }

    #[tokio::test]
    async fn test_evaluator_failure_aborts() {
        let (controller, generator, _) = controller(
            ScriptedGenerator::repeating(GOOD, 3),
            ScriptedEvaluator::new(vec![]),
        );

        let err = controller.run(product()).await.unwrap_err();
        assert!(err.is_external_call());
        assert_eq!(generator.feedback_seen().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_cap_fails_before_any_call() {
        let config = LoopConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let generator = Arc::new(ScriptedGenerator::new(&[GOOD]));
        let evaluator = Arc::new(ScriptedEvaluator::new(vec![]));
        let controller = LoopController::with_config(generator.clone(), evaluator, config);

        assert!(controller.run(product()).await.is_err());
        assert!(generator.feedback_seen().is_empty());
    }

    #[tokio::test]
    async fn test_outcome_artifact() {
        let (controller, _, _) = controller(
            ScriptedGenerator::new(&[GOOD]),
            ScriptedEvaluator::new(vec![Verdict::accept()]),
        );

        let artifact = controller.run(product()).await.unwrap().artifact();
        assert_eq!(artifact.schema_version, "1.0");
        assert_eq!(artifact.task_label, "Creative Generation");
        assert_eq!(artifact.candidate.text, GOOD);
    }
}
