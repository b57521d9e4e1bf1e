//! Command-line interface for country-atlas
//!
//! Provides `run`, `watch`, `fetch`, `info` and `completions` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod common;
mod completions;
mod fetch;
mod info;
mod run;
mod watch;

/// Merge a country registry, scraped country facts and economic indicator tables into one regional dataset
#[derive(Parser)]
#[command(name = "country-atlas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the registry, country facts and indicator tables once
    Run(run::RunArgs),

    /// Merge on a fixed interval until interrupted
    Watch(watch::WatchArgs),

    /// Download indicator tables for the lookback window
    Fetch(fetch::FetchArgs),

    /// Inspect the configured inputs without writing outputs
    Info(info::InfoArgs),

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

    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Watch(args) => watch::run(args),
        Commands::Fetch(args) => fetch::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Completions(args) => completions::run(args),
    }
}
