//! Validation System
//!
//! Two layers judge each candidate:
//! - PreFilter: deterministic word/emoji checks, no external calls
//! - QualityEvaluator: external critic, consulted only when the pre-filter passes

pub mod evaluator;
pub mod metrics;
pub mod prefilter;

pub use evaluator::{LlmEvaluator, QualityEvaluator};
pub use metrics::{emoji_count, word_count};
pub use prefilter::{PreFilter, PreFilterRules, rejection};
