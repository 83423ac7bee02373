//! Scribeloop CLI — the main entry point.
//!
//! Commands:
//! - `run`      — Research, write and critique one topic
//! - `serve`    — Start the HTTP gateway and front end
//! - `doctor`   — Diagnose config and provider health
//! - `onboard`  — Write a default config file
//! - `status`   — Show the effective configuration

use clap::{Parser, Subcommand};
use scribeloop_config::{AppConfig, ConfigError};

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "scribeloop",
    about = "Scribeloop — research, write and critique blog posts with a local LLM",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the provider base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the model name
    #[arg(long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for one topic
    Run {
        /// The topic to write about
        #[arg(short, long)]
        topic: String,

        /// Print the final run state as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP gateway with the web front end
    Serve {
        /// Override the port
        #[arg(short, long, env = "SCRIBELOOP_PORT")]
        port: Option<u16>,
    },

    /// Diagnose configuration and provider health
    Doctor,

    /// Write a default config file
    Onboard,

    /// Show the effective configuration
    Status,
}

/// Command-line overrides layered on top of the loaded config.
struct Overrides {
    base_url: Option<String>,
    model: Option<String>,
}

impl Overrides {
    fn apply(&self, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
        if let Some(base_url) = &self.base_url {
            config.provider.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = AppConfig::load();
    let logging_config = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    logging::init(cli.verbose, &logging_config);

    let overrides = Overrides {
        base_url: cli.base_url,
        model: cli.model,
    };
    let config = loaded.and_then(|c| overrides.apply(c));

    match cli.command {
        Commands::Run { topic, json } => commands::run::run(required(config)?, topic, json).await?,
        Commands::Serve { port } => commands::serve::run(required(config)?, port).await?,
        Commands::Doctor => commands::doctor::run(config).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run(required(config)?).await?,
    }

    Ok(())
}

fn required(config: Result<AppConfig, ConfigError>) -> Result<AppConfig, String> {
    config.map_err(|e| format!("Failed to load config: {e}"))
}
