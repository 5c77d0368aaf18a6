//! Adloop - ad copy generation with a validate-and-retry loop
//!
//! A generator LLM writes a short ad for a product, a local pre-filter and
//! an LLM critic judge it, and rejections are fed back verbatim until the
//! ad is accepted or the iteration cap is reached.

pub mod artifact;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod input;
pub mod llm;
pub mod prompt;
pub mod runner;
pub mod validation;

pub use error::{AdLoopError, Result};
