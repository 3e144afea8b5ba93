//! Hashing System - SHA-256 Fingerprints
//!
//! Provides deterministic, reproducible hashes of inputs and reports.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string, to_string_pretty};

use crate::input::InputSnapshot;
use crate::report::Report;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

/// Sorted keys, indented. The on-disk report format.
pub fn sorted_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string_pretty(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Fingerprint of the resolved input.
///
/// Inputs that resolve to the same snapshot (mirrored pitch, omitted
/// defaults, numeric strings) share a hash.
pub fn compute_input_hash(input: &InputSnapshot) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(input)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Fingerprint of a report; equal for equal reports
pub fn compute_report_hash(report: &Report) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(report)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

// We need hex encoding
mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}
