//! RW-C1: manifest and integrity verification.

use std::path::Path;

use weaver_primitives::{sha256, to_hex};

use crate::manifest::Manifest;

#[derive(Debug, Clone)]
pub struct VerifyResult {
    pub passed: bool,
    pub errors: Vec<String>,
    pub files_checked: usize,
    pub invariants_checked: Vec<String>,
}

/// Checks manifest schema presence, recomputes `pack_hash` over `files`,
/// and — if `base_path` is supplied — hashes each listed file on disk and
/// compares sha256 and size. Any mismatch is a fail; all mismatches are
/// collected rather than stopping at the first.
#[tracing::instrument(skip(manifest, base_path), fields(manifest_id = %manifest.manifest_id))]
pub fn verify(manifest: &Manifest, base_path: Option<&Path>) -> VerifyResult {
    let mut errors = Vec::new();

    if let Err(e) = manifest.check_schema() {
        errors.push(e.to_string());
    }

    let recomputed = manifest.compute_pack_hash();
    if recomputed != manifest.pack_hash {
        errors.push(format!(
            "pack_hash mismatch: manifest declares {}, recomputed {}",
            manifest.pack_hash, recomputed
        ));
    }

    let mut files_checked = 0;
    if let Some(base) = base_path {
        for (path, entry) in &manifest.files {
            let full = base.join(path);
            match std::fs::read(&full) {
                Ok(bytes) => {
                    files_checked += 1;
                    if bytes.len() as u64 != entry.size {
                        errors.push(format!(
                            "{path}: size mismatch (manifest {}, disk {})",
                            entry.size,
                            bytes.len()
                        ));
                    }
                    let actual = to_hex(&sha256(&bytes));
                    if actual != entry.sha256 {
                        errors.push(format!(
                            "{path}: sha256 mismatch (manifest {}, disk {actual})",
                            entry.sha256
                        ));
                    }
                }
                Err(e) => errors.push(format!("{path}: could not read from disk: {e}")),
            }
        }
    }

    let passed = errors.is_empty();
    if passed {
        tracing::info!(files_checked, "manifest verified");
    } else {
        tracing::warn!(error_count = errors.len(), "manifest verification failed");
    }

    VerifyResult {
        passed,
        errors,
        files_checked,
        invariants_checked: vec!["RW-C1".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FileEntry;
    use std::collections::BTreeMap;

    fn sample_manifest() -> Manifest {
        let mut files = BTreeMap::new();
        files.insert(
            "a.txt".to_string(),
            FileEntry {
                sha256: to_hex(&sha256(b"hello")),
                size: 5,
                content_type: None,
            },
        );
        let mut manifest = Manifest {
            schema_version: "0.1.0".to_string(),
            manifest_id: "RWMF-1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            weaverpack_id: "RWPK-1".to_string(),
            authorship: "tester".to_string(),
            license: "MIT".to_string(),
            files,
            pack_hash: String::new(),
            invariants_declared: vec!["RW-C1".to_string()],
            parent_manifest_id: None,
            lineage: vec![],
            disclosure_tier: None,
            sensitivity: None,
            timebase: None,
        };
        manifest.pack_hash = manifest.compute_pack_hash();
        manifest
    }

    #[test]
    fn a_correctly_hashed_manifest_passes() {
        let manifest = sample_manifest();
        let result = verify(&manifest, None);
        assert!(result.passed, "{:?}", result.errors);
    }

    #[test]
    fn a_tampered_pack_hash_fails() {
        let mut manifest = sample_manifest();
        manifest.pack_hash = "0".repeat(64);
        let result = verify(&manifest, None);
        assert!(!result.passed);
    }
}
