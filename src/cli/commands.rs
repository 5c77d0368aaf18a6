//! CLI definition using clap.
//!
//! Every flag is optional; anything not given comes from the config file
//! or the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Overrides, Provider};

/// Adloop - generate a short ad and retry until it passes review
#[derive(Parser, Debug)]
#[command(name = "adloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Product as "Name, Description, Audience"; prompts on stdin when absent
    #[arg(short, long)]
    pub product: Option<String>,

    /// Where to write the ADCP document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many rejections
    #[arg(short = 'n', long)]
    pub max_iterations: Option<u32>,

    /// LLM provider for both generation and evaluation
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Model name passed to the provider
    #[arg(short, long)]
    pub model: Option<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Flags that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            provider: self.provider,
            model: self.model.clone(),
            max_iterations: self.max_iterations,
            output: self.output.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["adloop"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.is_verbose());
        assert!(cli.product.is_none());

        let overrides = cli.overrides();
        assert!(overrides.provider.is_none());
        assert!(overrides.max_iterations.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["adloop", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["adloop", "--config", "/tmp/adloop.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/adloop.yml")));
    }

    #[test]
    fn test_cli_product() {
        let cli = Cli::try_parse_from(["adloop", "--product", "Neon, Energy drink, Gen-Z Gamers"]).unwrap();
        assert_eq!(cli.product.as_deref(), Some("Neon, Energy drink, Gen-Z Gamers"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "adloop",
            "--provider",
            "anthropic",
            "-m",
            "claude-3-5-haiku-latest",
            "-n",
            "3",
            "-o",
            "out/ad.json",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.provider, Some(Provider::Anthropic));
        assert_eq!(overrides.model.as_deref(), Some("claude-3-5-haiku-latest"));
        assert_eq!(overrides.max_iterations, Some(3));
        assert_eq!(overrides.output, Some(PathBuf::from("out/ad.json")));
    }

    #[test]
    fn test_cli_openai_provider_name() {
        let cli = Cli::try_parse_from(["adloop", "--provider", "openai"]).unwrap();
        assert_eq!(cli.provider, Some(Provider::OpenAi));
    }

    #[test]
    fn test_cli_rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["adloop", "--provider", "llama"]).is_err());
    }
}
