//! Common serde default value functions
//!
//! Used across boss records, sync records and settings to avoid duplication.

use serde::{Deserialize, Deserializer, de};

/// Default for enabled fields
pub fn default_true() -> bool {
    true
}

/// Parse a respawn interval given either as a number or a numeric string.
///
/// Hand-edited boss lists frequently quote the hours (`"respawnHour": "1.5"`).
pub fn parse_hours(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|h| h.is_finite())
}

/// Deserializer wrapper around [`parse_hours`]
pub fn deserialize_hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    parse_hours(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid respawn hours: {value}")))
}
