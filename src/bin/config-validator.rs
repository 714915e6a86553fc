//! # Sidequest Configuration Validator
//!
//! Command-line tool for checking the layered configuration of an environment
//! before starting a session.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sidequest_core::config::{ConfigManager, SidequestConfig};
use sidequest_core::constants::{
    option_label, DEPTH_OPTIONS, PATH_STYLE_OPTIONS, TIMELINE_OPTIONS, TONE_OPTIONS,
};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "config-validator")]
#[command(about = "Validate Sidequest configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Environment to validate (development, test, production, ...)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Configuration directory path (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (table, json)
    #[arg(long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate all configuration sections
    All,

    /// Validate a single section (model, retry, layout, generation)
    Component { name: String },

    /// Print the merged configuration with secrets masked
    Show,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .try_init();

    let result = match &cli.command {
        Some(Commands::All) | None => validate_all_config(&cli),
        Some(Commands::Component { name }) => validate_component(&cli, name),
        Some(Commands::Show) => show_config(&cli),
    };

    match result {
        Ok(()) => {
            info!("Configuration validation completed successfully");
            process::exit(0);
        }
        Err(e) => {
            error!("Configuration validation failed: {e:#}");
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    }
}

fn load(cli: &Cli) -> Result<std::sync::Arc<ConfigManager>> {
    ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &cli.environment)
        .with_context(|| format!("failed to load configuration for '{}'", cli.environment))
}

fn validate_all_config(cli: &Cli) -> Result<()> {
    println!("🔧 Validating Sidequest Configuration");
    println!("Environment: {}", cli.environment);

    let manager = load(cli)?;
    for path in manager.loaded_files() {
        println!("   📄 {}", path.display());
    }
    println!("✅ Configuration loaded and validated");

    let config = manager.config();
    validate_model_config(config);
    validate_retry_config(config);
    validate_layout_config(config);
    validate_generation_config(config);

    println!("\n🎉 All configuration validation checks passed!");
    Ok(())
}

fn validate_component(cli: &Cli, name: &str) -> Result<()> {
    let manager = load(cli)?;
    let config = manager.config();

    match name.to_lowercase().as_str() {
        "model" => validate_model_config(config),
        "retry" => validate_retry_config(config),
        "layout" => validate_layout_config(config),
        "generation" => validate_generation_config(config),
        other => bail!("Unknown component: {other}"),
    }

    println!("✅ Component '{name}' validation passed!");
    Ok(())
}

fn show_config(cli: &Cli) -> Result<()> {
    let manager = load(cli)?;
    let debug = manager.debug_config();

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&debug)?),
        "table" => {
            if let Some(sections) = debug["config"].as_object() {
                for (section, values) in sections {
                    println!("[{section}]");
                    if let Some(values) = values.as_object() {
                        for (key, value) in values {
                            println!("  {key:<24} {value}");
                        }
                    }
                }
            }
        }
        other => bail!("Unsupported format: {other}"),
    }
    Ok(())
}

fn validate_model_config(config: &SidequestConfig) {
    println!("🤖 Model");
    println!("   ✅ Endpoint: {}", config.model.endpoint);
    println!("   ✅ Model: {}", config.model.model);
    if std::env::var(&config.model.api_key_env).is_ok() {
        println!("   ✅ API key variable {} is set", config.model.api_key_env);
    } else {
        println!("   ⚠️  API key variable {} is not set", config.model.api_key_env);
    }
}

fn validate_retry_config(config: &SidequestConfig) {
    let policy = config.retry.policy();
    let delays: Vec<String> = (1..policy.max_attempts)
        .map(|attempt| format!("{:?}", policy.delay_for_attempt(attempt)))
        .collect();
    println!("⏱️  Retry");
    println!("   ✅ Attempts: {}", policy.max_attempts);
    println!("   ✅ Delays: [{}]", delays.join(", "));
}

fn validate_layout_config(config: &SidequestConfig) {
    println!("📐 Layout");
    println!(
        "   ✅ Node {}x{}, rank step {}, slot step {}",
        config.layout.node_width,
        config.layout.node_height,
        config.layout.rank_step(),
        config.layout.slot_step()
    );
}

fn validate_generation_config(config: &SidequestConfig) {
    let generation = &config.generation;
    println!("🌳 Generation defaults");
    println!(
        "   ✅ Tone: {}",
        option_label(&TONE_OPTIONS, &generation.tone).unwrap_or("unknown")
    );
    println!(
        "   ✅ Timeline: {}",
        option_label(&TIMELINE_OPTIONS, &generation.timeline).unwrap_or("unknown")
    );
    match PATH_STYLE_OPTIONS
        .iter()
        .find(|option| option.value == generation.path_style)
    {
        Some(option) => println!(
            "   ✅ Path style: {} ({})",
            option.label,
            option.description.unwrap_or("no description")
        ),
        None => println!("   ✅ Path style: {}", generation.path_style),
    }
    match option_label(&DEPTH_OPTIONS, &generation.depth) {
        Some(label) => println!("   ✅ Depth: {label}"),
        None => println!("   ✅ Depth: {} (custom)", generation.depth),
    }
}
