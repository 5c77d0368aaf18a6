//! LLM types for request/response communication
//!
//! Provider-neutral message types; each client maps them onto its own wire format.

use serde::{Deserialize, Serialize};

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A completion request - everything needed for one stateless LLM call
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// System prompt
    pub system: String,

    /// Conversation messages (a single user directive for this crate)
    pub messages: Vec<Message>,

    /// Max tokens override; client default when None
    pub max_tokens: Option<u32>,

    /// Model override; client default when None
    pub model: Option<String>,

    /// Ask the provider for a bare JSON object when it supports that
    pub json_output: bool,
}

impl CompletionRequest {
    /// Create a request with the given system prompt
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Append a user message
    pub fn with_user_message(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON-only output
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Concatenated text of every user message, in order
    pub fn user_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Why the model stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    /// The provider withheld or cut the output on policy grounds
    ContentFilter,
}

/// Token usage for a single call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (empty if the model produced none)
    pub content: String,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage for this call
    pub usage: Usage,
}

impl CompletionResponse {
    /// A plain end-of-turn text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("system")
            .with_user_message("first")
            .with_user_message("second")
            .with_max_tokens(256)
            .with_json_output();

        assert_eq!(request.system, "system");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_tokens, Some(256));
        assert!(request.json_output);
        assert_eq!(request.user_text(), "first\nsecond");
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(Usage::new(100, 20).total(), 120);
        assert_eq!(Usage::default().total(), 0);
    }

    #[test]
    fn test_text_response() {
        let response = CompletionResponse::text("hello");
        assert_eq!(response.content, "hello");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }
}
