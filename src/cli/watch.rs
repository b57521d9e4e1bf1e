//! Watch command implementation

use anyhow::Result;
use clap::Args;

use super::common::ConfigArgs;
use crate::pipeline;
use crate::schedule::{self, Interval};

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Days between merge runs
    #[arg(long, value_name = "DAYS")]
    pub interval_days: Option<f64>,

    /// Omit the report timestamp for reproducible diffs
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: WatchArgs) -> Result<()> {
    let config = args.config.resolve(args.no_timestamp, args.interval_days)?;

    println!("Merging every {} days; press Ctrl-C to stop", config.interval_days);
    let mut trigger = Interval::from_days(config.interval_days);
    schedule::run_on(&mut trigger, || pipeline::run_once(&config).map(|_| ()))
}
