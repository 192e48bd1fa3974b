//! Tolerant field access over raw store records.
//!
//! The backing record store enforces no schema: fields may be missing,
//! renamed between legacy and current datasets, or hold an unexpected JSON
//! type depending on how a record was created. Every accessor here is total —
//! absent or malformed input degrades to an empty/neutral value, never an
//! error. Aggregation code downstream relies on that contract.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw row from the record store: an opaque identifier plus a flat,
/// untyped field map. Link fields hold arrays of foreign record ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record from an id and field map. Mostly useful in tests.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// First candidate field that is present and non-null.
    ///
    /// Legacy and current field names coexist in the same dataset, so call
    /// sites pass every known alias in preference order.
    pub fn field(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .filter_map(|name| self.fields.get(*name))
            .find(|v| !v.is_null())
    }

    /// Trimmed string for the first matching field, empty if absent.
    pub fn text(&self, names: &[&str]) -> String {
        self.field(names).map(text_of).unwrap_or_default()
    }

    /// Numeric value for the first matching field.
    pub fn number(&self, names: &[&str]) -> Option<f64> {
        self.field(names).and_then(number_of)
    }

    /// Link ids for the first matching field.
    pub fn id_list(&self, names: &[&str]) -> Vec<String> {
        self.field(names).map(id_list_of).unwrap_or_default()
    }

    /// Calendar date for the first matching field.
    pub fn date(&self, names: &[&str]) -> Option<NaiveDate> {
        self.field(names).and_then(date_of)
    }
}

/// Trimmed string form of a JSON value. Objects and arrays have no useful
/// scalar form and yield an empty string.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Numeric form of a JSON value, accepting numbers and numeric strings.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A link field as a list of ids: arrays pass through element-wise, a lone
/// scalar becomes a one-element list, anything else is empty.
pub fn id_list_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(_) | Value::Number(_) => {
            let s = text_of(value);
            if s.is_empty() { Vec::new() } else { vec![s] }
        }
        _ => Vec::new(),
    }
}

/// Extract a calendar date from a date or timestamp value.
///
/// The store mixes `YYYY-MM-DD` date fields with full timestamps like
/// `2024-03-05T09:30:00.000Z`; both carry an ISO date prefix, which is all
/// the analytics layer operates on.
pub fn date_of(value: &Value) -> Option<NaiveDate> {
    static ISO_DATE: OnceLock<Regex> = OnceLock::new();
    let re = ISO_DATE.get_or_init(|| {
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("static pattern is valid")
    });

    let text = text_of(value);
    let caps = re.captures(&text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Tri-state success flag used by habit-tracking entries: boolean `true`,
/// the case-insensitive string `"yes"`, or the literal string `"1"`.
/// Everything else (including absence) is a failure.
pub fn is_success(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("yes") || s == "1"
        }
        _ => false,
    }
}
