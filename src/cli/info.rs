//! Info command implementation

use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;

use super::common::ConfigArgs;
use crate::domain::{FactSource, INDICATORS};
use crate::{facts, indicators, registry};

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let config = args.config.resolve(false, None)?;

    let registry = registry::load_registry(&config.registry_path)?;
    println!("Registry: {}", config.registry_path.display());
    println!("  Regions: {}", registry.regions.len());
    println!("  Countries: {}", registry.country_count());
    for region in &registry.regions {
        println!("    {}: {} countries", region.name, region.countries.len());
    }

    let fact_source = facts::load_facts(&config.facts_path)?;
    let shape = match &fact_source {
        FactSource::FlatList(_) => "flat list",
        FactSource::ByRegion(_) => "region-keyed",
    };
    let mut matched = 0;
    for region in &registry.regions {
        for entry in &region.countries {
            if fact_source.lookup(&region.name, &entry.name).is_some() {
                matched += 1;
            }
        }
    }
    println!(
        "Country facts: {} ({shape}, {} entries)",
        config.facts_path.display(),
        fact_source.len()
    );
    println!("  Coverage: {} of {} countries", matched, registry.country_count());

    let current_year = Utc::now().year();
    let tables =
        indicators::load_indicator_tables(&config.data_dir, config.lookback_years, current_year)?;
    println!("Indicator tables: {}", config.data_dir.display());
    if tables.is_empty() {
        println!("  none found (all indicators will be null)");
    } else {
        for table in &tables {
            println!(
                "  {}: {} countries, {} columns",
                table.year,
                table.country_count(),
                table.columns.len()
            );
        }
    }
    println!("  Tracked indicators: {}", INDICATORS.len());

    Ok(())
}
