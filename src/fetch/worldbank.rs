//! Synchronous client for the indicators API
//!
//! One request per (indicator, year), fanned out over a bounded worker pool.
//! Each year's series is pivoted into a registry-ordered table and written as
//! CSV plus a records-oriented JSON mirror. A failed download contributes an
//! empty column and never aborts the year.

use crate::domain::{Indicator, INDICATORS};
use crate::indicators::indicator_file_name;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_WORKERS: usize = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct Observation {
    country: CountryRef,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CountryRef {
    value: String,
}

/// One year's downloaded series: indicator display name → country → value.
#[derive(Debug, Clone, Default)]
pub struct YearSeries {
    pub year: i32,
    pub by_indicator: HashMap<String, HashMap<String, f64>>,
}

pub struct IndicatorClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl IndicatorClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("country-atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed building HTTP client")?;
        Ok(IndicatorClient { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    /// Download one (indicator, year) series: country display name → value.
    pub fn fetch_indicator_year(
        &self,
        indicator: &Indicator,
        year: i32,
    ) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/country/all/indicator/{}?format=json&per_page=1000&date={}",
            self.base_url, indicator.code, year
        );
        let response = self
            .http
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Request failed: {url}"))?;
        let payload: Value =
            response.json().with_context(|| format!("Invalid JSON from {url}"))?;
        parse_observations(&payload)
            .with_context(|| format!("Unexpected payload shape from {url}"))
    }

    /// Fetch every indicator for one year over the bounded worker pool.
    pub fn fetch_year(&self, year: i32, progress: Option<&ProgressBar>) -> Result<YearSeries> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(FETCH_WORKERS)
            .build()
            .context("Failed building fetch worker pool")?;

        let series: Vec<(String, HashMap<String, f64>)> = pool.install(|| {
            INDICATORS
                .par_iter()
                .map(|indicator| {
                    let downloaded = match self.fetch_indicator_year(indicator, year) {
                        Ok(values) => {
                            tracing::debug!(
                                "downloaded {} ({year}): {} countries",
                                indicator.name,
                                values.len()
                            );
                            values
                        }
                        Err(err) => {
                            tracing::warn!("download failed for {} ({year}): {err:#}", indicator.name);
                            HashMap::new()
                        }
                    };
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                    (indicator.name.to_string(), downloaded)
                })
                .collect()
        });

        Ok(YearSeries { year, by_indicator: series.into_iter().collect() })
    }
}

/// The observation array is the second element of the response payload; the
/// first element is request metadata.
pub fn parse_observations(payload: &Value) -> Result<HashMap<String, f64>> {
    let observations =
        payload.get(1).and_then(Value::as_array).context("missing observation array")?;

    let mut series = HashMap::new();
    for raw in observations {
        let observation: Observation = serde_json::from_value(raw.clone())
            .context("malformed observation entry")?;
        if let Some(value) = observation.value {
            series.insert(observation.country.value, value);
        }
    }
    Ok(series)
}

/// Pivot one year's series into the table files the merge pipeline consumes:
/// rows in registry country order, columns = `country` plus the indicator
/// display names.
pub fn write_year_tables(
    data_dir: &Path,
    ordered_countries: &[String],
    series: &YearSeries,
) -> Result<Vec<String>> {
    let csv_path = data_dir.join(indicator_file_name(series.year));
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed writing indicator table: {}", csv_path.display()))?;

    let mut header = vec!["country".to_string()];
    header.extend(INDICATORS.iter().map(|i| i.name.to_string()));
    writer.write_record(&header)?;

    for country in ordered_countries {
        let mut row = vec![country.clone()];
        for indicator in &INDICATORS {
            let cell = series
                .by_indicator
                .get(indicator.name)
                .and_then(|values| values.get(country))
                .map(|v| v.to_string())
                .unwrap_or_default();
            row.push(cell);
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let json_path = data_dir.join(format!("worldbank_indicators_data_{}.json", series.year));
    let records: Vec<Value> = ordered_countries
        .iter()
        .map(|country| {
            let mut obj = Map::new();
            obj.insert("country".to_string(), Value::String(country.clone()));
            for indicator in &INDICATORS {
                let value = series
                    .by_indicator
                    .get(indicator.name)
                    .and_then(|values| values.get(country))
                    .copied()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                obj.insert(indicator.name.to_string(), value);
            }
            Value::Object(obj)
        })
        .collect();
    fs::write(&json_path, serde_json::to_string_pretty(&records)?)
        .with_context(|| format!("Failed writing indicator JSON: {}", json_path.display()))?;

    Ok(vec![csv_path.display().to_string(), json_path.display().to_string()])
}
