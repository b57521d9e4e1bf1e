//! Fetch command implementation

use anyhow::Result;
use clap::Args;

use super::common::ConfigArgs;
use crate::pipeline;

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: FetchArgs) -> Result<()> {
    let config = args.config.resolve(false, None)?;
    let written = pipeline::run_fetch(&config)?;
    for file in &written {
        println!("Wrote {file}");
    }
    Ok(())
}
