//! Generated ad copy and its metadata.
//!
//! Field names on the wire follow the ADCP generation asset layout
//! (`type`, `content`, `content_metadata`, `brand_safety_check`).

use serde::{Deserialize, Serialize};

/// Metadata attached to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Length of the candidate text in characters (Unicode scalar values).
    #[serde(rename = "length")]
    pub char_length: usize,

    #[serde(rename = "sentiment")]
    pub sentiment_tag: String,
}

/// One generated piece of ad copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(rename = "content")]
    pub text: String,

    #[serde(rename = "content_metadata")]
    pub metadata: ContentMetadata,

    #[serde(rename = "brand_safety_check")]
    pub safety_flag: String,
}

impl Candidate {
    /// Build a candidate whose `char_length` is derived from `text`.
    pub fn new(
        kind: impl Into<String>,
        text: impl Into<String>,
        sentiment_tag: impl Into<String>,
        safety_flag: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            kind: kind.into(),
            metadata: ContentMetadata {
                char_length: char_length(&text),
                sentiment_tag: sentiment_tag.into(),
            },
            text,
            safety_flag: safety_flag.into(),
        }
    }

    /// Replace whatever length was reported with the length of `text`.
    pub fn with_recomputed_length(mut self) -> Self {
        self.metadata.char_length = char_length(&self.text);
        self
    }

    /// Whether `char_length` agrees with `text`.
    pub fn has_consistent_length(&self) -> bool {
        self.metadata.char_length == char_length(&self.text)
    }
}

/// Character count of `text`. Distinct from the word count used by the pre-filter.
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}
