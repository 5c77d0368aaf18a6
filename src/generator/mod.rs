//! Content generation - one candidate per call
//!
//! The generator's self-reported length is untrusted; the loop controller
//! recomputes it after every call.

mod llm_generator;

pub use llm_generator::LlmGenerator;

use async_trait::async_trait;

use crate::domain::{Candidate, ProductInput, Verdict};
use crate::error::Result;

/// Produces one candidate from the product and, optionally, the last rejection.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate a candidate.
    ///
    /// `feedback`, when present, is a rejection whose text must reach the
    /// model verbatim. A failed or malformed call is fatal to the run.
    async fn generate(&self, product: &ProductInput, feedback: Option<&Verdict>) -> Result<Candidate>;
}
