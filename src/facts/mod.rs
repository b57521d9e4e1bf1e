//! Country-fact source boundary
//!
//! The scraped dataset arrives in one of two shapes: a flat list of country
//! entries, or a region-keyed mapping to such lists. Both resolve here, once,
//! into [`FactSource`]; the merge engine only ever sees its `lookup`.

use crate::domain::{CountryFact, FactSource};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// The fact input was valid JSON but neither of the accepted shapes. Fatal:
/// silently skipping every fact would be indistinguishable from a fully
/// missing scrape.
#[derive(Debug, Error)]
#[error("country fact input is neither a list nor a region mapping (found {found})")]
pub struct FactShapeError {
    pub found: &'static str,
}

/// Load the scraped fact dataset. A missing file degrades to an empty source
/// (partial coverage is expected); an unreadable or shape-invalid file is an
/// error.
pub fn load_facts(path: &Path) -> Result<FactSource> {
    if !path.exists() {
        tracing::warn!("country fact file {} not found; merging without facts", path.display());
        return Ok(FactSource::empty());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading country fact file: {}", path.display()))?;
    parse_facts(&content)
        .with_context(|| format!("Invalid country fact file: {}", path.display()))
}

pub fn parse_facts(content: &str) -> Result<FactSource> {
    let raw: Value =
        serde_json::from_str(content).context("country fact input is not valid JSON")?;

    match raw {
        Value::Array(_) => {
            let facts: Vec<CountryFact> =
                serde_json::from_value(raw).context("invalid flat country fact list")?;
            Ok(FactSource::FlatList(facts))
        }
        Value::Object(map) => {
            let mut by_region = HashMap::with_capacity(map.len());
            for (region, entries) in map {
                let facts: Vec<CountryFact> = serde_json::from_value(entries)
                    .with_context(|| format!("invalid country fact list for region '{region}'"))?;
                by_region.insert(region, facts);
            }
            Ok(FactSource::ByRegion(by_region))
        }
        other => Err(FactShapeError { found: json_type_name(&other) }.into()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
