//! country-atlas: Merge country reference data into one regional dataset
//!
//! The pipeline reconciles three heterogeneously-shaped sources (a static
//! hierarchical registry, a scraped flat-or-region-keyed fact dataset and a
//! set of year-partitioned indicator tables) into one record per country,
//! with recency backfill for missing indicator values.

pub mod cli;
pub mod config;
pub mod domain;
pub mod facts;
pub mod fetch;
pub mod indicators;
pub mod merge;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod schedule;
pub mod utils;

pub use domain::{Config, FactSource, IndicatorTable, MergedDataset, MergedRecord, Registry};
pub use merge::merge_dataset;
