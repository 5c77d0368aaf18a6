use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use adloop::cli::Cli;
use adloop::config::{Config, LlmConfig, Provider};
use adloop::generator::LlmGenerator;
use adloop::input::resolve_product;
use adloop::llm::{AnthropicClient, LlmClient, OpenAiClient};
use adloop::runner::{IterationEvent, LoopController, RunOutcome};
use adloop::validation::LlmEvaluator;

fn setup_logging(log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("adloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("adloop.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the config file
    let env = env_logger::Env::default().default_filter_or(log_level.unwrap_or("info"));
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_client(llm: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match llm.provider {
        Provider::Anthropic => Arc::new(AnthropicClient::new(llm.anthropic()).context("Failed to create Anthropic client")?),
        Provider::OpenAi => Arc::new(OpenAiClient::new(llm.openai()).context("Failed to create OpenAI client")?),
    };
    info!("Using {:?} model {}", llm.provider, client.model());
    Ok(client)
}

fn report_iteration(event: &IterationEvent) {
    let status = if event.accepted {
        "accepted".green()
    } else {
        "rejected".red()
    };
    println!("{} {} [{}] {}", "Iteration".cyan(), event.cycle, event.source, status);
    println!("  {}", event.content);
    if !event.accepted {
        println!("  {} {}", "Feedback:".yellow(), event.feedback);
    }
}

fn report_outcome(outcome: &RunOutcome, json: &str, path: &Path) {
    if outcome.accepted() {
        println!("{}", "Ad accepted".green().bold());
    } else {
        println!(
            "{}",
            format!("Stopped after {} rejections; keeping the last ad", outcome.iterations)
                .yellow()
                .bold()
        );
    }
    println!("{}", json);
    println!("{} {}", "Saved to".green(), path.display());
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let product = {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        resolve_product(cli.product.as_deref(), &mut reader, &mut writer).context("Failed to read product input")?
    };
    info!("Product: {}", product);

    let client = build_client(&config.llm)?;
    let rules = config.generation.rules();
    let generator = LlmGenerator::new(client.clone())
        .with_rules(rules)
        .with_max_tokens(config.llm.max_tokens);
    let evaluator = LlmEvaluator::new(client)
        .with_rules(rules)
        .with_max_tokens(config.llm.max_tokens);

    let controller = LoopController::with_config(
        Arc::new(generator),
        Arc::new(evaluator),
        config.generation.loop_config(),
    );

    let outcome = controller
        .run_with_observer(product, report_iteration)
        .await
        .context("Ad generation failed")?;

    let artifact = outcome.artifact();
    artifact
        .write_to(&config.output.path)
        .context("Failed to save output")?;

    let json = artifact.to_json_pretty()?;
    report_outcome(&outcome, &json, &config.output.path);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = try_main().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn try_main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then let flags override it
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .apply(cli.overrides());
    config.validate().context("Invalid configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")
}
