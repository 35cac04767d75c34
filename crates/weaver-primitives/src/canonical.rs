//! Canonical JSON: a deterministic wire form used for hashing, and a
//! pretty form used for human-readable artifacts.
//!
//! Both variants recursively sort object keys. `serde_json::Map` is backed
//! by a `BTreeMap` in this workspace (the `preserve_order` feature is never
//! enabled), so any `Value` built from object literals or deserialized JSON
//! already iterates its keys in sorted order — no extra sorting pass is
//! needed here.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum CanonicalError {
    #[error("json serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Dense, separator-minimized form with sorted keys and no trailing
/// newline. This is the form hashed by dictionary IDs, pack hashes, and
/// proof-object commitments.
pub fn to_wire_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    let v = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&v)?)
}

/// Sorted-key, two-space-indented form with a trailing newline, used for
/// receipts and lineage artifacts meant to be read by a person.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalError> {
    let v = serde_json::to_value(value)?;
    let mut bytes = serde_json::to_vec_pretty(&v)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Convenience for callers already holding a `Value` rather than a typed
/// struct.
pub fn wire_json_value(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("Value serialization never fails")
}
