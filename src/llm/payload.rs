//! Payload parser for structured JSON answers embedded in model text
//!
//! Models are asked for a bare JSON object but sometimes wrap it in a
//! markdown fence or a sentence of prose. This module finds the object
//! and deserializes it into the caller's type.

use log::debug;
use serde::de::DeserializeOwned;

use crate::error::{AdLoopError, Result};
use crate::llm::types::{CompletionResponse, StopReason};

/// Locate the outermost JSON object in `text`.
///
/// Returns the slice from the first `{` to the last `}` once any surrounding
/// markdown code fence is removed.
fn extract_json_object(text: &str) -> Option<&str> {
    let body = strip_code_fence(text.trim());
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&body[start..=end])
}

/// Deserialize a structured payload out of model text.
///
/// `what` names the payload in error messages ("generation asset", "verdict").
fn parse_payload<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    if text.trim().is_empty() {
        return Err(AdLoopError::InvalidPayload(format!("empty {} response", what)));
    }

    let object = extract_json_object(text).ok_or_else(|| {
        AdLoopError::InvalidPayload(format!(
            "no JSON object in {} response: {}",
            what,
            truncate_for_error(text, 100)
        ))
    })?;

    serde_json::from_str(object)
        .map_err(|e| AdLoopError::InvalidPayload(format!("malformed {}: {}", what, e)))
}

/// Deserialize the payload of a finished response.
///
/// Output cut off at the token limit or withheld by the provider's content
/// filter is an external-call failure, reported before any parsing.
pub fn parse_response_payload<T: DeserializeOwned>(response: &CompletionResponse, what: &str) -> Result<T> {
    debug!("{} response: {} tokens, {:?}", what, response.usage.total(), response.stop_reason);

    match response.stop_reason {
        StopReason::MaxTokens => Err(AdLoopError::ExternalCall(format!(
            "{} response truncated at max_tokens",
            what
        ))),
        StopReason::ContentFilter => Err(AdLoopError::ExternalCall(format!(
            "{} response blocked by the provider's content filter",
            what
        ))),
        StopReason::EndTurn | StopReason::StopSequence => parse_payload(&response.content, what),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line (```json)
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Truncate text for error messages.
fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
