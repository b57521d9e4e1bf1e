//! Indicator table loading
//!
//! The statistics fetcher leaves one CSV per year in the data directory,
//! named by a year-suffixed convention. This module discovers the files for
//! the lookback window and parses them into [`IndicatorTable`]s ordered most
//! recent first, which is the order the merge engine's backfill scan relies on.

use crate::domain::IndicatorTable;
use anyhow::{Context, Result};
use std::path::Path;

pub fn indicator_file_name(year: i32) -> String {
    format!("worldbank_indicators_data_{year}.csv")
}

/// The years eligible for the backfill scan, newest first. The current year
/// is excluded because its tables are still incomplete upstream.
pub fn lookback_window(current_year: i32, lookback_years: usize) -> Vec<i32> {
    (1..=lookback_years as i32).map(|offset| current_year - offset).collect()
}

/// Load every indicator table present for the lookback window. A missing
/// year file is skipped, not an error; an empty result is legal and simply
/// leaves every indicator null downstream.
pub fn load_indicator_tables(
    data_dir: &Path,
    lookback_years: usize,
    current_year: i32,
) -> Result<Vec<IndicatorTable>> {
    let mut tables = Vec::new();
    for year in lookback_window(current_year, lookback_years) {
        let path = data_dir.join(indicator_file_name(year));
        if !path.exists() {
            tracing::debug!("no indicator table for {year}");
            continue;
        }
        let table = load_indicator_table(&path, year)
            .with_context(|| format!("Failed reading indicator table: {}", path.display()))?;
        tracing::debug!("loaded indicator table for {year} ({} countries)", table.country_count());
        tables.push(table);
    }
    if tables.is_empty() {
        tracing::warn!(
            "no indicator tables found under {}; all indicators will be null",
            data_dir.display()
        );
    }
    Ok(tables)
}

/// Parse one year table. The first column holds the country key; every other
/// header is an indicator column. Empty or unparseable cells are nulls.
pub fn load_indicator_table(path: &Path, year: i32) -> Result<IndicatorTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut table = IndicatorTable::new(year, columns.clone());
    for result in reader.records() {
        let record = result?;
        let country = match record.get(0) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        for (idx, column) in columns.iter().enumerate() {
            let cell = record.get(idx + 1).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) => table.insert(&country, column, value),
                Err(_) => {
                    tracing::debug!("unparseable cell {cell:?} for {country}/{column} in {year}")
                }
            }
        }
    }
    Ok(table)
}
