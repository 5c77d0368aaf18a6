use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::artifact::DEFAULT_OUTPUT_PATH;
use crate::error::{AdLoopError, Result};
use crate::llm::{AnthropicConfig, OpenAiConfig};
use crate::runner::{DEFAULT_MAX_ITERATIONS, LoopConfig};
use crate::validation::PreFilterRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

/// Which LLM service backs the generator and the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Anthropic => "claude-sonnet-4-20250514",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    /// Falls back to the provider's default model when unset
    pub model: Option<String>,
    pub max_tokens: u32,
    /// No timeout unless set
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: None,
            max_tokens: 1024,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn anthropic(&self) -> AnthropicConfig {
        AnthropicConfig {
            model: self.model().to_string(),
            max_tokens: self.max_tokens,
            timeout: self.timeout(),
        }
    }

    pub fn openai(&self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model().to_string(),
            max_tokens: self.max_tokens,
            timeout: self.timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_iterations: u32,
    pub max_words: usize,
    pub required_emojis: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let rules = PreFilterRules::default();
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_words: rules.max_words,
            required_emojis: rules.required_emojis,
        }
    }
}

impl GenerationConfig {
    pub fn rules(&self) -> PreFilterRules {
        PreFilterRules {
            max_words: self.max_words,
            required_emojis: self.required_emojis,
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            max_iterations: self.max_iterations,
            rules: self.rules(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub max_iterations: Option<u32>,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AdLoopError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| AdLoopError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(provider) = overrides.provider {
            // A model named in the file belongs to the file's provider
            if provider != self.llm.provider {
                self.llm.model = None;
            }
            self.llm.provider = provider;
        }
        if let Some(model) = overrides.model {
            self.llm.model = Some(model);
        }
        if let Some(max_iterations) = overrides.max_iterations {
            self.generation.max_iterations = max_iterations;
        }
        if let Some(output) = overrides.output {
            self.output.path = output;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.generation.loop_config().validate()?;
        if self.llm.max_tokens == 0 {
            return Err(AdLoopError::Config("llm.max_tokens must be at least 1".to_string()));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(AdLoopError::Config("output.path must not be empty".to_string()));
        }
        Ok(())
    }
}
