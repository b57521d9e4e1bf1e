//! Run command implementation

use anyhow::Result;
use clap::Args;

use super::common::ConfigArgs;
use crate::pipeline;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Omit the report timestamp for reproducible diffs
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = args.config.resolve(args.no_timestamp, None)?;
    let outcome = pipeline::run_once(&config)?;

    let stats = &outcome.stats;
    println!("Merged {} countries across {} regions", stats.countries, stats.regions);
    println!("  Facts matched: {} ({} missing)", stats.facts_matched, stats.facts_missing);
    println!(
        "  Indicators resolved: {} ({} backfilled, {} missing)",
        stats.indicators_resolved, stats.indicators_backfilled, stats.indicators_missing
    );
    if stats.years_scanned.is_empty() {
        println!("  Indicator years: none found");
    } else {
        let years: Vec<String> = stats.years_scanned.iter().map(i32::to_string).collect();
        println!("  Indicator years: {}", years.join(", "));
    }
    for file in &outcome.output_files {
        println!("  Wrote {file}");
    }
    Ok(())
}
