//! Command-line interface for relay-sync
//!
//! Thin presentation layer over the sync core: subcommands for syncing,
//! manual additions, status reporting, and ledger capture.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config;

mod add;
mod capture;
mod completions;
mod doctor;
mod scan;
mod status;
mod sync;
mod utils;

/// Mirror RES subreddit filters into Relay for Reddit over ADB and OCR
#[derive(Parser)]
#[command(name = "relay-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (relay-sync.toml or .relay-sync.yml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync all subreddit filters from a RES backup to Relay for Reddit
    Sync(sync::SyncArgs),

    /// Add specific subreddit filters to Relay
    Add(add::AddArgs),

    /// Compare the RES backup and ledger filter sets
    Status(status::StatusArgs),

    /// Rebuild the ledger by OCR-scanning the live filter screen
    Capture(capture::CaptureArgs),

    /// Extract subreddits from screenshots in a directory
    Scan(scan::ScanArgs),

    /// Check that adb, tesseract, and a device are available
    Doctor,

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let cwd = std::env::current_dir()?;
    let cfg = config::load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::Sync(args) => sync::run(args, &cfg),
        Commands::Add(args) => add::run(args, &cfg),
        Commands::Status(args) => status::run(args, &cfg),
        Commands::Capture(args) => capture::run(args, &cfg),
        Commands::Scan(args) => scan::run(args, &cfg),
        Commands::Doctor => doctor::run(&cfg),
        Commands::Completions(args) => completions::run(args),
    }
}
