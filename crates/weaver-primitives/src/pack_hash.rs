//! Pack-hash: the content fixation scheme WeaverPack manifests use (I3).

use std::collections::BTreeMap;

use crate::hashing::sha256;

/// Computes `SHA-256` over the concatenation, for each path in
/// lexicographic order, of `path`, `:`, the file's sha256 hex digest, and
/// a trailing newline.
///
/// `files` maps path to the file's sha256 hex digest; a `BTreeMap` is
/// required so iteration order is already lexicographic by construction.
pub fn compute(files: &BTreeMap<String, String>) -> [u8; 32] {
    let mut buf = Vec::new();
    for (path, sha256_hex) in files {
        buf.extend_from_slice(path.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(sha256_hex.as_bytes());
        buf.push(b'\n');
    }
    sha256(&buf)
}
