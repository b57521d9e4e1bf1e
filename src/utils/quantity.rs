//! Lenient parsing of scraped quantity text
//!
//! Scraped area/population figures arrive either as plain numbers
//! ("1,234,567") or with a unit token ("2.5 million"). Anything without a
//! numeric token parses to `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9][0-9,.]*)").unwrap());

/// Parse a scraped quantity string into a whole number.
///
/// Thousands separators are stripped, a trailing "million" scales by 1e6 and
/// the result is truncated to an integer.
pub fn parse_quantity(text: &str) -> Option<u64> {
    let captures = NUMBER_TOKEN.captures(text)?;
    let number: f64 = captures[1].replace(',', "").parse().ok()?;
    let scaled = if text.contains("million") { number * 1_000_000.0 } else { number };
    if scaled < 0.0 || !scaled.is_finite() {
        return None;
    }
    Some(scaled as u64)
}

/// Quantity from an already-parsed JSON value: numbers pass through
/// (truncated), strings go through [`parse_quantity`], everything else is
/// `None`.
pub fn from_value_lenient(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => parse_quantity(s),
        _ => None,
    }
}

/// serde adapter for fact fields that may hold a number, scraped text, or
/// nothing at all.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_lenient(&value))
}
