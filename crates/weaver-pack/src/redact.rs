//! RW-C4: redaction. Never mutates the source manifest or its file
//! bytes; produces a fresh manifest with updated file entries and a
//! lineage entry pointing back at the source.

use std::collections::BTreeMap;

use regex::Regex;
use weaver_primitives::{ids, sha256, to_hex};

use crate::error::PackError;
use crate::manifest::{LineageEntry, Manifest, Sensitivity};

pub const REDACTION_TOKEN: &str = "[[REDACTED]]";

#[derive(Debug, Clone)]
pub struct RedactionEntry {
    pub path: String,
    pub matches_replaced: usize,
}

#[derive(Debug, Clone)]
pub struct RedactionResult {
    pub manifest: Manifest,
    pub files: BTreeMap<String, Vec<u8>>,
    pub entries: Vec<RedactionEntry>,
}

/// Applies `patterns` (regexes) to the content of every file in
/// `file_bytes`, replacing matches with [`REDACTION_TOKEN`]. Content is
/// decoded as UTF-8 with invalid sequences replaced (matching the byte
/// transform's lossy-text contract), then re-encoded.
#[tracing::instrument(skip(source, patterns, file_bytes, timestamp), fields(source_manifest_id = %source.manifest_id, pattern_count = patterns.len()))]
pub fn redact_manifest(
    source: &Manifest,
    patterns: &[String],
    file_bytes: &BTreeMap<String, Vec<u8>>,
    timestamp: impl Into<String>,
) -> Result<RedactionResult, PackError> {
    if patterns.is_empty() {
        tracing::warn!("redact called with no patterns");
        return Err(PackError::Governance(
            "redact requires at least one pattern".to_string(),
        ));
    }
    let compiled: Vec<Regex> = patterns
        .iter()
        .map(|p| Regex::new(p))
        .collect::<Result<_, _>>()?;

    let mut manifest = source.clone();
    manifest.manifest_id = ids::generate("RWMF");

    let mut redacted_files = BTreeMap::new();
    let mut entries = Vec::new();

    for (path, bytes) in file_bytes {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let mut replaced = 0usize;
        let mut redacted_text = text;
        for re in &compiled {
            let matched = re.find_iter(&redacted_text).count();
            replaced += matched;
            redacted_text = re.replace_all(&redacted_text, REDACTION_TOKEN).into_owned();
        }
        let redacted_bytes = redacted_text.into_bytes();

        if let Some(entry) = manifest.files.get_mut(path) {
            entry.sha256 = to_hex(&sha256(&redacted_bytes));
            entry.size = redacted_bytes.len() as u64;
        }
        entries.push(RedactionEntry {
            path: path.clone(),
            matches_replaced: replaced,
        });
        redacted_files.insert(path.clone(), redacted_bytes);
    }

    let mut sensitivity = manifest.sensitivity.clone().unwrap_or_default();
    sensitivity.redacted = true;
    manifest.sensitivity = Some(sensitivity);

    manifest.lineage.push(LineageEntry {
        operation: "redact".to_string(),
        source_manifest_id: source.manifest_id.clone(),
        timestamp: timestamp.into(),
        receipt_ref: None,
    });
    manifest.parent_manifest_id = Some(source.manifest_id.clone());
    manifest.pack_hash = manifest.compute_pack_hash();

    tracing::info!(
        new_manifest_id = %manifest.manifest_id,
        files_redacted = entries.len(),
        "redaction complete"
    );

    Ok(RedactionResult {
        manifest,
        files: redacted_files,
        entries,
    })
}

/// Checks that `manifest`'s most recent lineage entry is a redact event
/// pointing at `expected_source_id`.
pub fn verify_redaction_lineage(manifest: &Manifest, expected_source_id: &str) -> bool {
    manifest
        .lineage
        .last()
        .map(|e| e.operation == "redact" && e.source_manifest_id == expected_source_id)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FileEntry;

    fn source_manifest(files: &BTreeMap<String, Vec<u8>>) -> Manifest {
        let entries: BTreeMap<String, FileEntry> = files
            .iter()
            .map(|(path, bytes)| {
                (
                    path.clone(),
                    FileEntry {
                        sha256: to_hex(&sha256(bytes)),
                        size: bytes.len() as u64,
                        content_type: None,
                    },
                )
            })
            .collect();
        let mut manifest = Manifest {
            schema_version: "0.1.0".to_string(),
            manifest_id: "RWMF-src".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            weaverpack_id: "RWPK-1".to_string(),
            authorship: "tester".to_string(),
            license: "MIT".to_string(),
            files: entries,
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
    fn redaction_never_mutates_the_source() {
        let mut files = BTreeMap::new();
        files.insert("secret.txt".to_string(), b"ssn: 123-45-6789".to_vec());
        let source = source_manifest(&files);
        let before = source.clone();

        let result = redact_manifest(&source, &[r"\d{3}-\d{2}-\d{4}".to_string()], &files, "t").unwrap();

        assert_eq!(source, before);
        assert_ne!(result.manifest.manifest_id, source.manifest_id);
        assert!(result.manifest.sensitivity.unwrap().redacted);
        let redacted = &result.files["secret.txt"];
        assert!(String::from_utf8_lossy(redacted).contains(REDACTION_TOKEN));
    }

    #[test]
    fn empty_patterns_is_a_governance_violation() {
        let files = BTreeMap::new();
        let source = source_manifest(&files);
        let err = redact_manifest(&source, &[], &files, "t").unwrap_err();
        assert!(matches!(err, PackError::Governance(_)));
    }
}
