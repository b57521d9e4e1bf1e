//! CLI override merging

use crate::domain::Config;
use std::path::PathBuf;

/// CLI-provided values; `None` means "not given, keep the config file value".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub registry_path: Option<PathBuf>,
    pub facts_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub lookback_years: Option<usize>,
    pub interval_days: Option<f64>,
    pub api_base_url: Option<String>,
    pub no_timestamp: bool,
}

pub fn merge_cli_with_config(mut config: Config, overrides: CliOverrides) -> Config {
    if let Some(path) = overrides.registry_path {
        config.registry_path = path;
    }
    if let Some(path) = overrides.facts_path {
        config.facts_path = path;
    }
    if let Some(dir) = overrides.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = overrides.output_dir {
        config.output_dir = dir;
    }
    if let Some(years) = overrides.lookback_years {
        config.lookback_years = years;
    }
    if let Some(days) = overrides.interval_days {
        config.interval_days = days;
    }
    if let Some(url) = overrides.api_base_url {
        config.api_base_url = url;
    }
    if overrides.no_timestamp {
        config.include_timestamp = false;
    }
    config
}
