//! Core data model shared across the pipeline
//!
//! Holds the configuration struct, the three input shapes (registry, country
//! facts, indicator tables) and the merged output records. Everything here is
//! plain data; loading and merging live in their own modules.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::utils::quantity;

/// Schema version written into merge reports.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Output file names, relative to the configured output directory.
pub const NESTED_OUTPUT_FILE: &str = "merged_country_data.json";
pub const TABLE_OUTPUT_FILE: &str = "merged_country_data.csv";
pub const REPORT_OUTPUT_FILE: &str = "merge_report.json";

/// One economic/demographic indicator: the statistics-API code plus the
/// display name used as a column header in the year tables and as a key in
/// the merged records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub code: &'static str,
    pub name: &'static str,
}

/// The fixed indicator set. Order here defines column and key order in every
/// rendered output.
pub const INDICATORS: [Indicator; 10] = [
    Indicator { code: "NY.GDP.MKTP.CD", name: "GDP (current US$)" },
    Indicator { code: "NY.GDP.PCAP.CD", name: "GDP per capita (current US$)" },
    Indicator { code: "NY.GNP.PCAP.CD", name: "GNI per capita (current US$)" },
    Indicator { code: "SP.URB.TOTL.IN.ZS", name: "Urban population (% of total)" },
    Indicator { code: "NY.GDP.MKTP.KD.ZG", name: "GDP growth (annual %)" },
    Indicator { code: "TX.VAL.MRCH.CD.WT", name: "Merchandise exports (current US$)" },
    Indicator { code: "TM.VAL.MRCH.CD.WT", name: "Merchandise imports (current US$)" },
    Indicator { code: "SP.DYN.CBRT.IN", name: "Birth rate, crude (per 1,000 people)" },
    Indicator { code: "SP.DYN.CDRT.IN", name: "Death rate, crude (per 1,000 people)" },
    Indicator { code: "SP.POP.DPND", name: "Age dependency ratio (% of working-age population)" },
];

/// Pipeline configuration with proper precedence (CLI > config file > defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry JSON file: region name → { "countries": [...] }.
    pub registry_path: PathBuf,

    /// Scraped country fact JSON file (flat list or region-keyed mapping).
    pub facts_path: PathBuf,

    /// Directory holding the year-suffixed indicator tables.
    pub data_dir: PathBuf,

    /// Directory the merged outputs are written to.
    pub output_dir: PathBuf,

    /// How many recent years to scan for indicator values.
    pub lookback_years: usize,

    /// Days between merge runs in watch mode.
    pub interval_days: f64,

    /// Base URL of the statistics API used by the fetch command.
    pub api_base_url: String,

    /// Whether the merge report carries a `generated_at` timestamp.
    pub include_timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry_path: PathBuf::from("countylink.json"),
            facts_path: PathBuf::from("data/country_data.json"),
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("data"),
            lookback_years: 3,
            interval_days: 2.0,
            api_base_url: "https://api.worldbank.org/v2".to_string(),
            include_timestamp: true,
        }
    }
}

/// One registry country. Field names follow the registry file's keys; the
/// struct uses the domain names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    #[serde(rename = "chinese")]
    pub localized_name: String,
    pub code: String,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

/// A region and its countries, in registry file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub countries: Vec<RegistryEntry>,
}

/// The authoritative enumeration of regions and countries. Read-only after
/// load; ordering is structural (`Vec` position), never map iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub regions: Vec<Region>,
}

impl Registry {
    pub fn country_count(&self) -> usize {
        self.regions.iter().map(|r| r.countries.len()).sum()
    }

    /// All country names in registry order, across regions. The fetch command
    /// uses this to keep indicator table rows in registry order.
    pub fn country_names(&self) -> Vec<String> {
        self.regions
            .iter()
            .flat_map(|r| r.countries.iter().map(|c| c.name.clone()))
            .collect()
    }
}

/// Scraped geography/demographics snapshot for one country. Any subset of
/// fields may be absent; area and population cells are accepted as numbers or
/// as raw scraped text ("1,234,567", "2.5 million").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryFact {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default, deserialize_with = "quantity::deserialize_lenient")]
    pub area: Option<u64>,
    #[serde(default, deserialize_with = "quantity::deserialize_lenient")]
    pub population: Option<u64>,
}

/// The two shapes the scraped fact dataset arrives in, resolved once at load
/// time so the merge engine only ever sees one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum FactSource {
    FlatList(Vec<CountryFact>),
    ByRegion(HashMap<String, Vec<CountryFact>>),
}

impl FactSource {
    pub fn empty() -> Self {
        FactSource::FlatList(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            FactSource::FlatList(facts) => facts.len(),
            FactSource::ByRegion(by_region) => by_region.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact-name lookup. A region-keyed source only searches the matching
    /// region's list; there is no cross-region fallback.
    pub fn lookup(&self, region: &str, name: &str) -> Option<&CountryFact> {
        match self {
            FactSource::FlatList(facts) => facts.iter().find(|f| f.name == name),
            FactSource::ByRegion(by_region) => {
                by_region.get(region).and_then(|facts| facts.iter().find(|f| f.name == name))
            }
        }
    }
}

/// One year's indicator snapshot: the table's column set plus the non-null
/// cells. A country row with an empty cell and a missing country row behave
/// identically on lookup, which is exactly what the backfill scan needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    pub year: i32,
    pub columns: Vec<String>,
    values: HashMap<String, HashMap<String, f64>>,
}

impl IndicatorTable {
    pub fn new(year: i32, columns: Vec<String>) -> Self {
        IndicatorTable { year, columns, values: HashMap::new() }
    }

    pub fn insert(&mut self, country: &str, indicator: &str, value: f64) {
        self.values
            .entry(country.to_string())
            .or_default()
            .insert(indicator.to_string(), value);
    }

    pub fn value(&self, country: &str, indicator: &str) -> Option<f64> {
        self.values.get(country).and_then(|row| row.get(indicator)).copied()
    }

    pub fn country_count(&self) -> usize {
        self.values.len()
    }
}

/// The final denormalized record for one country. Missing data is explicit
/// `None`, never omission.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub name: String,
    pub localized_name: String,
    pub code: String,
    pub source_url: String,
    pub capital: Option<String>,
    pub area: Option<u64>,
    pub population: Option<u64>,
    pub latitude: f64,
    pub longitude: f64,
    /// One entry per indicator display name, always all 10 keys.
    pub indicators: BTreeMap<String, Option<f64>>,
}

/// One region's merged records, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRegion {
    pub name: String,
    pub records: Vec<MergedRecord>,
}

/// The complete merge output: exactly one record per registry entry, regions
/// and records in registry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDataset {
    pub regions: Vec<MergedRegion>,
}

impl MergedDataset {
    pub fn record_count(&self) -> usize {
        self.regions.iter().map(|r| r.records.len()).sum()
    }
}

/// Counters collected during a merge run, for the report and the CLI summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeStats {
    pub regions: usize,
    pub countries: usize,
    pub facts_matched: usize,
    pub facts_missing: usize,
    pub indicators_resolved: usize,
    /// Resolved from a year older than the newest available table.
    pub indicators_backfilled: usize,
    pub indicators_missing: usize,
    /// Years of the tables that were scanned, newest first.
    pub years_scanned: Vec<i32>,
}

impl MergeStats {
    pub fn to_report_value(&self) -> Value {
        json!({
            "regions": self.regions,
            "countries": self.countries,
            "facts": {
                "matched": self.facts_matched,
                "missing": self.facts_missing,
            },
            "indicators": {
                "resolved": self.indicators_resolved,
                "backfilled": self.indicators_backfilled,
                "missing": self.indicators_missing,
            },
            "years_scanned": self.years_scanned,
        })
    }
}
