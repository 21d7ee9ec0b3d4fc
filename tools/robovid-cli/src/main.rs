//! Robovid CLI: turn a topic into a narrated video.
//!
//! Usage:
//!   robovid init <TERM>     Create the content snapshot for a topic
//!   robovid text            Fetch, sanitize, split, and enrich the article
//!   robovid render          Compose images, write the script, render video
//!   robovid run             Text stage followed by render stage
//!   robovid info            Show the current content snapshot
//!   robovid check           Check external tools and credentials

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use robovid_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "robovid",
    about = "Automated narrated videos from encyclopedia articles",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $ROBOVID_CONFIG or ~/.config/robovid/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Content directory override
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the content snapshot for a new topic
    Init {
        /// Search term / article title
        term: String,

        /// Maximum number of sentences to narrate
        #[arg(short, long, default_value = "7")]
        max_sentences: usize,

        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },

    /// Run the text stage
    Text,

    /// Run the render stage
    Render,

    /// Run the text stage, then the render stage
    Run,

    /// Show the current content snapshot
    Info,

    /// Check external tools and credentials
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;
    if let Some(dir) = cli.content_dir {
        config.content_dir = dir;
    }

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    robovid_common::logging::init_logging(&logging);
    tracing::debug!(content_dir = %config.content_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Init {
            term,
            max_sentences,
            force,
        } => commands::init::run(&config, term, max_sentences, force),
        Commands::Text => commands::text::run(&config).await,
        Commands::Render => commands::render::run(&config).await,
        Commands::Run => commands::run::run(&config).await,
        Commands::Info => commands::info::run(&config),
        Commands::Check => commands::check::run(&config),
    }
}
