//! Nested document rendering
//!
//! Region grouping and registry ordering are preserved: the document's keys
//! are regions in registry order, each holding its merged records in order.
//! Key order inside a record is fixed, so reruns on identical inputs produce
//! byte-identical JSON.

use crate::domain::{MergedDataset, MergedRecord, INDICATORS};
use serde_json::{Map, Number, Value};

pub fn render_nested(dataset: &MergedDataset) -> Value {
    let mut root = Map::new();
    for region in &dataset.regions {
        let records: Vec<Value> = region.records.iter().map(record_value).collect();
        root.insert(region.name.clone(), Value::Array(records));
    }
    Value::Object(root)
}

fn record_value(record: &MergedRecord) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), Value::String(record.name.clone()));
    obj.insert("chinese".to_string(), Value::String(record.localized_name.clone()));
    obj.insert("code".to_string(), Value::String(record.code.clone()));
    obj.insert("url".to_string(), Value::String(record.source_url.clone()));
    obj.insert("capital".to_string(), opt_string(record.capital.as_deref()));
    obj.insert("area".to_string(), opt_u64(record.area));
    obj.insert("population".to_string(), opt_u64(record.population));
    for indicator in &INDICATORS {
        let value = record.indicators.get(indicator.name).copied().flatten();
        obj.insert(indicator.name.to_string(), opt_f64(value));
    }
    obj.insert("lat".to_string(), float(record.latitude));
    obj.insert("lng".to_string(), float(record.longitude));
    Value::Object(obj)
}

fn opt_string(value: Option<&str>) -> Value {
    value.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}

fn opt_u64(value: Option<u64>) -> Value {
    value.map(|n| Value::Number(Number::from(n))).unwrap_or(Value::Null)
}

fn opt_f64(value: Option<f64>) -> Value {
    value.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}
