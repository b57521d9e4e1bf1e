//! Merge report generation

use crate::domain::{MergeStats, REPORT_SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use serde_json::{Map, Value};
use std::path::Path;

pub fn write_report(
    report_path: &Path,
    stats: &MergeStats,
    config: &Value,
    output_files: &[String],
    dataset_sha256: &str,
    include_timestamp: bool,
) -> Result<()> {
    let mut sorted_output_files = output_files.to_vec();
    sorted_output_files.sort();

    let mut report = Map::new();
    report.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    report.insert("stats".to_string(), stats.to_report_value());
    report.insert("config".to_string(), config.clone());
    report.insert("output_files".to_string(), serde_json::to_value(sorted_output_files)?);
    report.insert("dataset_sha256".to_string(), Value::String(dataset_sha256.to_string()));

    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&Value::Object(report))?)?;
    Ok(())
}
