//! Response payload normalization.
//!
//! Successful JSON payloads go through an ordered list of stages before they
//! reach the caller. Every stage is idempotent, so normalizing an already
//! normalized payload is a no-op.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::DATA_BASE;

/// Field names whose values are parsed as timestamps, at any depth.
pub const TIMESTAMP_FIELDS: &[&str] = &[
    "creationTimestamp",
    "expiryTimestamp",
    "updateTimestamp",
    "lastFailedTimestamp",
    "statusChangedTimestamp",
    "startTimestamp",
    "timestamp",
];

const AFFECTED_RECORDS_VARIANTS: &[&str] = &["records_affected", "recordsAffected"];

/// A single transformation applied to a response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeStage {
    /// Convert every object key to camelCase. Skipped for pass-through paths.
    CamelizeKeys,
    /// Canonicalize [`TIMESTAMP_FIELDS`] values to RFC 3339 UTC with millis.
    ParseTimestamps,
    /// Rename `records_affected` / `recordsAffected` to `affectedRecords`.
    RenameAffectedRecords,
}

/// Ordered pipeline of [`NormalizeStage`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stages: Vec<NormalizeStage>,
    passthrough_prefixes: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            stages: vec![
                NormalizeStage::CamelizeKeys,
                NormalizeStage::ParseTimestamps,
                NormalizeStage::RenameAffectedRecords,
            ],
            passthrough_prefixes: vec![DATA_BASE.to_string()],
        }
    }
}

impl Normalizer {
    /// Create the default pipeline with custom pass-through prefixes.
    pub fn with_passthrough_prefixes(prefixes: Vec<String>) -> Self {
        Self {
            passthrough_prefixes: prefixes,
            ..Default::default()
        }
    }

    /// Replace the stage list.
    pub fn with_stages(mut self, stages: Vec<NormalizeStage>) -> Self {
        self.stages = stages;
        self
    }

    /// Returns the configured stages in application order.
    pub fn stages(&self) -> &[NormalizeStage] {
        &self.stages
    }

    /// Returns true if payloads from `path` keep their keys untouched.
    pub fn is_passthrough(&self, path: &str) -> bool {
        self.passthrough_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Normalize the payload of a successful response to `path`.
    pub fn normalize(&self, path: &str, mut value: Value) -> Value {
        let passthrough = self.is_passthrough(path);
        for stage in &self.stages {
            value = match stage {
                NormalizeStage::CamelizeKeys if passthrough => value,
                NormalizeStage::CamelizeKeys => rename_keys(value, &|key| camelize(key)),
                NormalizeStage::ParseTimestamps => parse_timestamps(value),
                NormalizeStage::RenameAffectedRecords => rename_keys(value, &|key| {
                    if AFFECTED_RECORDS_VARIANTS.contains(&key) {
                        "affectedRecords".to_string()
                    } else {
                        key.to_string()
                    }
                }),
            };
        }
        value
    }
}

/// Convert a key to camelCase.
///
/// Separators (`-`, `_`, whitespace) are dropped and the character after
/// them is upper-cased; the first character is lower-cased. Numeric keys
/// are returned unchanged.
pub(crate) fn camelize(key: &str) -> String {
    if !key.is_empty() && key.parse::<f64>().is_ok() {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => out,
    }
}

fn rename_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (rename(&k), rename_keys(v, rename)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rename_keys(v, rename)).collect())
        }
        other => other,
    }
}

fn parse_timestamps(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let v = if TIMESTAMP_FIELDS.contains(&k.as_str()) {
                        canonical_timestamp(v)
                    } else {
                        parse_timestamps(v)
                    };
                    (k, v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(parse_timestamps).collect()),
        other => other,
    }
}

fn canonical_timestamp(value: Value) -> Value {
    let parsed = match &value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };

    match parsed {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        // Nested objects under a timestamp key still get recursed into.
        None => parse_timestamps(value),
    }
}
