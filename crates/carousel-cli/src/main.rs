use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(author, version, about = "An auto-scrolling, drag-to-fling terminal carousel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive carousel
    Run {
        /// Card deck file (TOML), overrides `ui.cards_path`
        #[arg(short, long)]
        cards: Option<PathBuf>,
    },
    /// Replay a scripted interaction and print a JSON-lines trace
    Simulate {
        /// Script file (TOML)
        script: PathBuf,
        /// Print every n-th frame
        #[arg(short, long, default_value_t = 1)]
        every: usize,
    },
    /// Show configuration
    Config {
        /// Print the configuration file path
        #[arg(long)]
        path: bool,
        /// Print the built-in defaults instead of the loaded configuration
        #[arg(long)]
        defaults: bool,
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The terminal UI owns stdout, so `run` logs to a file
    let interactive = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Run { cards }) => commands::run::run(config, cards).await,
        None => commands::run::run(config, None).await,
        Some(Commands::Simulate { script, every }) => {
            commands::simulate::run(&config, &script, every)
        }
        Some(Commands::Config {
            path,
            defaults,
            init,
        }) => commands::config::run(&config, path, defaults, init),
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
