//! LLM Client Layer - provider integrations behind one narrow trait
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - AnthropicClient and OpenAiClient implementations
//! - MockLlmClient for deterministic tests
//! - JSON payload extraction from model text

pub mod anthropic;
pub mod client;
pub mod openai;
pub mod payload;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, LlmError, MockLlmClient};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use payload::parse_response_payload;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, Usage};
