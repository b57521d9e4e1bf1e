//! Flat table rendering
//!
//! One row per country with a `region` column prepended. The column set is
//! the union of fields across all records: an indicator populated for any
//! country gets a column for every country, with empty cells where the value
//! is null.

use crate::domain::{MergedDataset, MergedRecord, INDICATORS};
use anyhow::Result;
use std::collections::BTreeSet;

const BASE_COLUMNS: &[&str] =
    &["region", "name", "chinese", "code", "url", "capital", "area", "population"];

pub fn render_table(dataset: &MergedDataset) -> Result<Vec<u8>> {
    // Spreadsheet tools need the BOM to detect UTF-8.
    let mut buf = vec![0xEF, 0xBB, 0xBF];
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        let indicator_columns = indicator_union(dataset);
        let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
        header.extend(indicator_columns.iter().copied());
        header.push("lat");
        header.push("lng");
        writer.write_record(&header)?;

        for region in &dataset.regions {
            for record in &region.records {
                writer.write_record(row(&region.name, record, &indicator_columns))?;
            }
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Indicator columns present in any record, in the fixed indicator order.
fn indicator_union(dataset: &MergedDataset) -> Vec<&'static str> {
    let present: BTreeSet<&str> = dataset
        .regions
        .iter()
        .flat_map(|r| &r.records)
        .flat_map(|record| record.indicators.keys().map(String::as_str))
        .collect();
    INDICATORS.iter().map(|i| i.name).filter(|name| present.contains(name)).collect()
}

fn row(region: &str, record: &MergedRecord, indicator_columns: &[&'static str]) -> Vec<String> {
    let mut cells = vec![
        region.to_string(),
        record.name.clone(),
        record.localized_name.clone(),
        record.code.clone(),
        record.source_url.clone(),
        record.capital.clone().unwrap_or_default(),
        record.area.map(|v| v.to_string()).unwrap_or_default(),
        record.population.map(|v| v.to_string()).unwrap_or_default(),
    ];
    for column in indicator_columns {
        let value = record.indicators.get(*column).copied().flatten();
        cells.push(value.map(|v| v.to_string()).unwrap_or_default());
    }
    cells.push(record.latitude.to_string());
    cells.push(record.longitude.to_string());
    cells
}
