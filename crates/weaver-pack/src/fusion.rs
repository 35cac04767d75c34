//! RW-C8: fusion. Merges two or more verified source manifests into a
//! single target, recording every path conflict and its resolution.

use std::collections::BTreeMap;

use weaver_primitives::ids;

use crate::error::PackError;
use crate::manifest::{FileEntry, LineageEntry, Manifest};

#[derive(Debug, Clone)]
pub struct MergePlan {
    pub weaverpack_id: String,
    pub primary_index: usize,
    /// For every conflicting path, which source index's content wins.
    pub file_resolutions: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct ConflictRecord {
    pub path: String,
    pub candidates: Vec<(usize, String)>,
    pub resolved_source_index: usize,
    pub resolved_sha256: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConflictLedger {
    pub conflicts: Vec<ConflictRecord>,
}

#[derive(Debug, Clone)]
pub struct FusionResult {
    pub manifest: Manifest,
    pub files: BTreeMap<String, Vec<u8>>,
    pub conflict_ledger: ConflictLedger,
}

/// Merges `sources` per `plan`. Requires at least two verified sources.
/// A path present with divergent sha256 across sources is a conflict;
/// every conflict must have an explicit resolution in
/// `plan.file_resolutions` or the whole operation fails, with every
/// unresolved conflict reported together.
#[tracing::instrument(skip(sources, plan, file_bytes), fields(source_count = sources.len(), weaverpack_id = %plan.weaverpack_id))]
pub fn fusion(
    sources: &[Manifest],
    plan: &MergePlan,
    file_bytes: &[BTreeMap<String, Vec<u8>>],
) -> Result<FusionResult, PackError> {
    if sources.len() < 2 {
        tracing::warn!("fusion called with fewer than two sources");
        return Err(PackError::Governance(
            "fusion requires at least two source manifests".to_string(),
        ));
    }
    if sources.len() != file_bytes.len() {
        return Err(PackError::Governance(
            "fusion requires one file-bytes map per source manifest".to_string(),
        ));
    }
    if plan.primary_index >= sources.len() {
        return Err(PackError::Governance(format!(
            "primary_index {} out of range",
            plan.primary_index
        )));
    }

    for source in sources {
        source.check_schema()?;
    }

    let mut by_path: BTreeMap<String, Vec<(usize, FileEntry)>> = BTreeMap::new();
    for (idx, source) in sources.iter().enumerate() {
        for (path, entry) in &source.files {
            by_path
                .entry(path.clone())
                .or_default()
                .push((idx, entry.clone()));
        }
    }

    let mut unresolved = Vec::new();
    let mut ledger = ConflictLedger::default();
    let mut merged_entries: BTreeMap<String, FileEntry> = BTreeMap::new();
    let mut merged_bytes: BTreeMap<String, Vec<u8>> = BTreeMap::new();

    for (path, candidates) in &by_path {
        let distinct_shas: std::collections::BTreeSet<&str> =
            candidates.iter().map(|(_, e)| e.sha256.as_str()).collect();

        let winner_idx = if distinct_shas.len() <= 1 {
            candidates[0].0
        } else {
            match plan.file_resolutions.get(path) {
                Some(idx) if candidates.iter().any(|(i, _)| i == idx) => {
                    let chosen = candidates.iter().find(|(i, _)| i == idx).unwrap();
                    ledger.conflicts.push(ConflictRecord {
                        path: path.clone(),
                        candidates: candidates
                            .iter()
                            .map(|(i, e)| (*i, e.sha256.clone()))
                            .collect(),
                        resolved_source_index: *idx,
                        resolved_sha256: chosen.1.sha256.clone(),
                    });
                    *idx
                }
                _ => {
                    unresolved.push(format!(
                        "unresolved conflict at {path}: candidates from sources {:?}",
                        candidates.iter().map(|(i, _)| *i).collect::<Vec<_>>()
                    ));
                    continue;
                }
            }
        };

        let entry = candidates
            .iter()
            .find(|(i, _)| *i == winner_idx)
            .map(|(_, e)| e.clone())
            .unwrap();
        if let Some(bytes) = file_bytes[winner_idx].get(path) {
            merged_bytes.insert(path.clone(), bytes.clone());
        }
        merged_entries.insert(path.clone(), entry);
    }

    if !unresolved.is_empty() {
        tracing::warn!(unresolved_count = unresolved.len(), "fusion has unresolved conflicts");
        return Err(PackError::Governance(unresolved.join("; ")));
    }

    let primary = &sources[plan.primary_index];
    let manifest_id = ids::generate("RWMF");
    let mut manifest = Manifest {
        schema_version: primary.schema_version.clone(),
        manifest_id,
        created_at: primary.created_at.clone(),
        weaverpack_id: plan.weaverpack_id.clone(),
        authorship: primary.authorship.clone(),
        license: primary.license.clone(),
        files: merged_entries,
        pack_hash: String::new(),
        invariants_declared: primary.invariants_declared.clone(),
        parent_manifest_id: Some(primary.manifest_id.clone()),
        lineage: sources
            .iter()
            .map(|s| LineageEntry {
                operation: "fusion".to_string(),
                source_manifest_id: s.manifest_id.clone(),
                timestamp: primary.created_at.clone(),
                receipt_ref: None,
            })
            .collect(),
        disclosure_tier: primary.disclosure_tier.clone(),
        sensitivity: primary.sensitivity.clone(),
        timebase: primary.timebase.clone(),
    };
    manifest.pack_hash = manifest.compute_pack_hash();

    tracing::info!(
        new_manifest_id = %manifest.manifest_id,
        conflicts_resolved = ledger.conflicts.len(),
        "fusion complete"
    );

    Ok(FusionResult {
        manifest,
        files: merged_bytes,
        conflict_ledger: ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weaver_primitives::{sha256, to_hex};

    fn manifest_with(id: &str, files: &BTreeMap<String, Vec<u8>>) -> Manifest {
        let entries: BTreeMap<String, FileEntry> = files
            .iter()
            .map(|(p, b)| {
                (
                    p.clone(),
                    FileEntry {
                        sha256: to_hex(&sha256(b)),
                        size: b.len() as u64,
                        content_type: None,
                    },
                )
            })
            .collect();
        let mut manifest = Manifest {
            schema_version: "0.1.0".to_string(),
            manifest_id: id.to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            weaverpack_id: "RWPK-src".to_string(),
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
    fn non_conflicting_paths_merge_without_a_ledger_entry() {
        let mut a_files = BTreeMap::new();
        a_files.insert("a.txt".to_string(), b"alpha".to_vec());
        let mut b_files = BTreeMap::new();
        b_files.insert("b.txt".to_string(), b"beta".to_vec());

        let a = manifest_with("RWMF-a", &a_files);
        let b = manifest_with("RWMF-b", &b_files);
        let plan = MergePlan {
            weaverpack_id: "RWPK-merged".to_string(),
            primary_index: 0,
            file_resolutions: BTreeMap::new(),
        };
        let result = fusion(&[a, b], &plan, &[a_files, b_files]).unwrap();
        assert_eq!(result.manifest.files.len(), 2);
        assert!(result.conflict_ledger.conflicts.is_empty());
    }

    #[test]
    fn a_divergent_path_without_a_resolution_fails() {
        let mut a_files = BTreeMap::new();
        a_files.insert("shared.txt".to_string(), b"version-a".to_vec());
        let mut b_files = BTreeMap::new();
        b_files.insert("shared.txt".to_string(), b"version-b".to_vec());

        let a = manifest_with("RWMF-a", &a_files);
        let b = manifest_with("RWMF-b", &b_files);
        let plan = MergePlan {
            weaverpack_id: "RWPK-merged".to_string(),
            primary_index: 0,
            file_resolutions: BTreeMap::new(),
        };
        let err = fusion(&[a, b], &plan, &[a_files, b_files]).unwrap_err();
        assert!(matches!(err, PackError::Governance(_)));
    }

    #[test]
    fn a_divergent_path_with_a_resolution_records_a_conflict() {
        let mut a_files = BTreeMap::new();
        a_files.insert("shared.txt".to_string(), b"version-a".to_vec());
        let mut b_files = BTreeMap::new();
        b_files.insert("shared.txt".to_string(), b"version-b".to_vec());

        let a = manifest_with("RWMF-a", &a_files);
        let b = manifest_with("RWMF-b", &b_files);
        let mut file_resolutions = BTreeMap::new();
        file_resolutions.insert("shared.txt".to_string(), 1usize);
        let plan = MergePlan {
            weaverpack_id: "RWPK-merged".to_string(),
            primary_index: 0,
            file_resolutions,
        };
        let result = fusion(&[a, b], &plan, &[a_files, b_files]).unwrap();
        assert_eq!(result.conflict_ledger.conflicts.len(), 1);
        assert_eq!(
            result.files["shared.txt"],
            b"version-b".to_vec()
        );
    }
}
