//! LLM-backed content generator.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::ContentGenerator;
use crate::domain::{Candidate, ContentMetadata, ProductInput, Verdict};
use crate::error::{AdLoopError, Result};
use crate::llm::{CompletionRequest, LlmClient, parse_response_payload};
use crate::prompt::{GENERATOR_SYSTEM, generation_directive};
use crate::validation::PreFilterRules;

/// Generation asset as the model returns it.
#[derive(Debug, Deserialize)]
struct GeneratedAsset {
    #[serde(rename = "type")]
    kind: String,
    content: String,
    content_metadata: GeneratedMetadata,
    brand_safety_check: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedMetadata {
    /// Self-reported; any shape is accepted because it is discarded later
    #[serde(default)]
    length: Option<Value>,
    sentiment: String,
}

impl GeneratedAsset {
    fn into_candidate(self) -> Result<Candidate> {
        if self.content.trim().is_empty() {
            return Err(AdLoopError::InvalidPayload(
                "generation asset has empty content".to_string(),
            ));
        }

        let reported_length = self
            .content_metadata
            .length
            .as_ref()
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;

        Ok(Candidate {
            kind: self.kind,
            text: self.content,
            metadata: ContentMetadata {
                char_length: reported_length,
                sentiment_tag: self.content_metadata.sentiment,
            },
            safety_flag: self.brand_safety_check,
        })
    }
}

/// Generator that asks an LLM for a JSON generation asset.
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
    rules: PreFilterRules,
    max_tokens: u32,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            rules: PreFilterRules::default(),
            max_tokens: 500,
        }
    }

    /// Tell the model the same thresholds the pre-filter enforces.
    pub fn with_rules(mut self, rules: PreFilterRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, product: &ProductInput, feedback: Option<&Verdict>) -> CompletionRequest {
        CompletionRequest::new(GENERATOR_SYSTEM)
            .with_user_message(generation_directive(product, feedback, &self.rules))
            .with_max_tokens(self.max_tokens)
            .with_json_output()
    }
}

#[async_trait]
impl ContentGenerator for LlmGenerator {
    async fn generate(&self, product: &ProductInput, feedback: Option<&Verdict>) -> Result<Candidate> {
        if feedback.is_some_and(|v| v.accepted) {
            return Err(AdLoopError::InvalidState(
                "generator cannot be primed with an accepted verdict".to_string(),
            ));
        }

        let response = self.client.complete(self.build_request(product, feedback)).await?;
        let asset: GeneratedAsset = parse_response_payload(&response, "generation asset")?;
        let candidate = asset.into_candidate()?;

        debug!(
            "generated candidate: {:?} (reported length {})",
            candidate.text, candidate.metadata.char_length
        );
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MockLlmClient, StopReason};
    use crate::prompt::REGENERATION_NOTE;

    const ASSET: &str = r#"{
        "target_audience": "Adults",
        "type": "text_ad",
        "content": "Indulge in Cadbury 🍫 anytime!",
        "content_metadata": { "length": 3, "sentiment": "playful" },
        "brand_safety_check": "passed"
    }"#;

    fn product() -> ProductInput {
        ProductInput::new("Cadbury Dairy Milk", "milk chocolate bar", "Adults").unwrap()
    }

    #[tokio::test]
    async fn test_generate_parses_asset() {
        let client = Arc::new(MockLlmClient::with_texts([ASSET]));
        let generator = LlmGenerator::new(client);

        let candidate = generator.generate(&product(), None).await.unwrap();

        assert_eq!(candidate.kind, "text_ad");
        assert_eq!(candidate.text, "Indulge in Cadbury 🍫 anytime!");
        assert_eq!(candidate.metadata.sentiment_tag, "playful");
        assert_eq!(candidate.safety_flag, "passed");
        // Reported value is passed through untouched; the controller fixes it
        assert_eq!(candidate.metadata.char_length, 3);
    }

    #[tokio::test]
    async fn test_generate_sends_product_and_feedback() {
        let client = Arc::new(MockLlmClient::with_texts([ASSET, ASSET]));
        let generator = LlmGenerator::new(client.clone());

        generator.generate(&product(), None).await.unwrap();
        let feedback = Verdict::reject("Word count is more than 15. Emoji count is not 1.");
        generator.generate(&product(), Some(&feedback)).await.unwrap();

        let requests = client.requests();
        assert!(requests[0].user_text().contains("product_name='Cadbury Dairy Milk'"));
        assert!(!requests[0].user_text().contains(REGENERATION_NOTE));
        assert!(
            requests[1]
                .user_text()
                .contains("Word count is more than 15. Emoji count is not 1.")
        );
        assert!(requests[1].json_output);
    }

    #[tokio::test]
    async fn test_generate_rejects_accepted_feedback() {
        let client = Arc::new(MockLlmClient::with_texts([ASSET]));
        let generator = LlmGenerator::new(client.clone());

        let err = generator.generate(&product(), Some(&Verdict::accept())).await.unwrap_err();
        assert!(matches!(err, AdLoopError::InvalidState(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_tolerates_odd_reported_length() {
        let asset = r#"{"type": "text_ad", "content": "Hi 🎉", "content_metadata": {"length": "four", "sentiment": "calm"}, "brand_safety_check": "passed"}"#;
        let client = Arc::new(MockLlmClient::with_texts([asset]));

        let candidate = LlmGenerator::new(client).generate(&product(), None).await.unwrap();
        assert_eq!(candidate.metadata.char_length, 0);
    }

    #[tokio::test]
    async fn test_generate_missing_field_is_fatal() {
        let asset = r#"{"type": "text_ad", "content": "Hi 🎉", "brand_safety_check": "passed"}"#;
        let client = Arc::new(MockLlmClient::with_texts([asset]));

        let err = LlmGenerator::new(client).generate(&product(), None).await.unwrap_err();
        assert!(matches!(err, AdLoopError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_generate_empty_content_is_fatal() {
        let asset = r#"{"type": "text_ad", "content": "  ", "content_metadata": {"sentiment": "calm"}, "brand_safety_check": "passed"}"#;
        let client = Arc::new(MockLlmClient::with_texts([asset]));

        let err = LlmGenerator::new(client).generate(&product(), None).await.unwrap_err();
        assert!(err.to_string().contains("empty content"));
    }

    #[tokio::test]
    async fn test_generate_transport_failure_is_fatal() {
        let client = Arc::new(MockLlmClient::new());
        client.push_error("503");

        let err = LlmGenerator::new(client).generate(&product(), None).await.unwrap_err();
        assert!(err.is_external_call());
    }

    #[tokio::test]
    async fn test_generate_truncated_output_is_reported_as_truncation() {
        let client = Arc::new(MockLlmClient::new());
        client.push_response(CompletionResponse {
            stop_reason: StopReason::MaxTokens,
            ..CompletionResponse::text(r#"{"type": "text_ad", "content": "Indulge in Cadb"#)
        });

        let err = LlmGenerator::new(client).generate(&product(), None).await.unwrap_err();
        assert!(matches!(err, AdLoopError::ExternalCall(_)));
        assert!(err.to_string().contains("generation asset response truncated at max_tokens"));
    }

    #[tokio::test]
    async fn test_generate_filtered_output_is_fatal() {
        let client = Arc::new(MockLlmClient::new());
        client.push_response(CompletionResponse {
            stop_reason: StopReason::ContentFilter,
            ..CompletionResponse::text("")
        });

        let err = LlmGenerator::new(client).generate(&product(), None).await.unwrap_err();
        assert!(matches!(err, AdLoopError::ExternalCall(_)));
    }
}
