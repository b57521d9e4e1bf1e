//! Registry loading
//!
//! The registry is the authoritative enumeration of regions and countries;
//! every downstream lookup is keyed off it. A missing or malformed registry
//! file is fatal; the merge cannot proceed without it.

use crate::domain::{Region, Registry, RegistryEntry};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct RegionBody {
    countries: Vec<RegistryEntry>,
}

pub fn load_registry(path: &Path) -> Result<Registry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed reading registry file: {}", path.display()))?;
    parse_registry(&content)
        .with_context(|| format!("Invalid registry file: {}", path.display()))
}

/// Parse the registry document: top-level keys are region names, each mapping
/// to `{"countries": [...]}`. serde_json's ordered map keeps regions in file
/// order, which becomes the explicit ordering of the returned `Vec`.
pub fn parse_registry(content: &str) -> Result<Registry> {
    let raw: serde_json::Map<String, Value> = serde_json::from_str(content)
        .context("registry root must be an object keyed by region name")?;

    let mut regions = Vec::with_capacity(raw.len());
    for (name, body) in raw {
        let body: RegionBody = serde_json::from_value(body)
            .with_context(|| format!("invalid region entry '{name}'"))?;
        regions.push(Region { name, countries: body.countries });
    }
    Ok(Registry { regions })
}
