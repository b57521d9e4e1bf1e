//! Shared configuration arguments

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Input/output options shared by every data-touching subcommand.
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to config file (country-atlas.toml or .country-atlas.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Registry JSON file (region → countries)
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Scraped country fact JSON file
    #[arg(long, value_name = "FILE")]
    pub facts: Option<PathBuf>,

    /// Directory holding the year-suffixed indicator tables
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for merged outputs
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of recent years scanned for indicator values
    #[arg(long, value_name = "N")]
    pub lookback_years: Option<usize>,

    /// Statistics API base URL
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,
}

impl ConfigArgs {
    /// Resolve the effective configuration: CLI > config file > defaults.
    pub fn resolve(&self, no_timestamp: bool, interval_days: Option<f64>) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let file_config = load_config(&cwd, self.config.as_deref())?;
        let overrides = CliOverrides {
            registry_path: self.registry.clone(),
            facts_path: self.facts.clone(),
            data_dir: self.data_dir.clone(),
            output_dir: self.output_dir.clone(),
            lookback_years: self.lookback_years,
            interval_days,
            api_base_url: self.api_base_url.clone(),
            no_timestamp,
        };
        Ok(merge_cli_with_config(file_config, overrides))
    }
}
