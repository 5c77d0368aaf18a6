//! Product metadata supplied once per run.

use serde::{Deserialize, Serialize};

use crate::error::{AdLoopError, Result};

/// The product an ad is written for. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    name: String,
    description: String,
    target_audience: String,
}

impl ProductInput {
    /// Build a product from three fields. Each is trimmed and must be non-empty.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target_audience: impl Into<String>,
    ) -> Result<Self> {
        let name = require_field("product name", name.into())?;
        let description = require_field("product description", description.into())?;
        let target_audience = require_field("target audience", target_audience.into())?;

        Ok(Self {
            name,
            description,
            target_audience,
        })
    }

    /// Parse a `Name, Description, Audience` line.
    pub fn parse_triple(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();

        if parts.len() != 3 {
            return Err(AdLoopError::InputValidation(format!(
                "expected 3 comma-separated fields, got {}",
                parts.len()
            )));
        }

        Self::new(parts[0], parts[1], parts[2])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }
}

impl std::fmt::Display for ProductInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "product_name='{}' product_description='{}' target_audience='{}'",
            self.name, self.description, self.target_audience
        )
    }
}

fn require_field(label: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdLoopError::InputValidation(format!("{} must not be empty", label)));
    }
    Ok(trimmed.to_string())
}
