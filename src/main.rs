//! country-atlas: Merge country reference data into one regional dataset
//!
//! Joins a static country registry, a scraped geography/demographics dataset
//! and year-partitioned economic indicator tables into one denormalized
//! dataset keyed by region and country.

use anyhow::Result;

fn main() -> Result<()> {
    country_atlas::cli::run()
}
