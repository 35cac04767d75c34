//! RW-C9: fission. Splits a verified source manifest into two or more
//! children per an explicit plan, producing a lineage map that accounts
//! for every source file (I5: no silent split).

use std::collections::{BTreeMap, BTreeSet};

use weaver_primitives::{ids, sha256, to_hex};

use crate::error::PackError;
use crate::manifest::{FileEntry, LineageEntry, Manifest};

#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Copy,
    Slice { offset: u64, length: u64 },
    Filter,
    Redact,
    Drop,
}

#[derive(Debug, Clone)]
pub struct SplitDirective {
    pub source_path: String,
    pub child_index: usize,
    pub dest_path: String,
    pub transform: Transform,
    pub lossy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimebasePolicy {
    Inherit,
    Realign,
}

#[derive(Debug, Clone)]
pub enum LicensePolicy {
    CarryForward,
    Explicit(String),
}

#[derive(Debug, Clone)]
pub struct SplitPlan {
    pub child_labels: Vec<String>,
    pub directives: Vec<SplitDirective>,
    pub timebase_policy: TimebasePolicy,
    pub license_policy: LicensePolicy,
}

#[derive(Debug, Clone)]
pub struct FileMapping {
    pub source_path: String,
    pub child_index: usize,
    pub dest_path: String,
    pub transform: Transform,
}

#[derive(Debug, Clone, Default)]
pub struct LossSummary {
    pub has_loss: bool,
    pub dropped_files: Vec<String>,
    pub truncated_files: Vec<String>,
    pub total_bytes_lost: u64,
}

#[derive(Debug, Clone)]
pub struct LineageMap {
    pub source_manifest_id: String,
    pub children_manifest_ids: Vec<String>,
    pub file_mappings: Vec<FileMapping>,
    pub timebase_policy: TimebasePolicy,
    pub loss_summary: LossSummary,
    pub license_carry_forward: bool,
}

#[derive(Debug, Clone)]
pub struct FissionResult {
    pub children: Vec<Manifest>,
    pub children_files: Vec<BTreeMap<String, Vec<u8>>>,
    pub lineage_map: LineageMap,
}

fn apply_transform(bytes: &[u8], transform: &Transform) -> Vec<u8> {
    match transform {
        Transform::Copy | Transform::Filter | Transform::Redact => bytes.to_vec(),
        Transform::Slice { offset, length } => {
            let start = (*offset as usize).min(bytes.len());
            let end = start.saturating_add(*length as usize).min(bytes.len());
            bytes[start..end].to_vec()
        }
        Transform::Drop => Vec::new(),
    }
}

/// Splits `source` per `plan`. Requires at least two children and every
/// source file accounted for by some directive, either assigned to a
/// child or explicitly dropped — otherwise this is a *silent split*
/// governance violation.
#[tracing::instrument(skip(source, plan, file_bytes), fields(source_manifest_id = %source.manifest_id, children = plan.child_labels.len()))]
pub fn fission(
    source: &Manifest,
    plan: &SplitPlan,
    file_bytes: &BTreeMap<String, Vec<u8>>,
) -> Result<FissionResult, PackError> {
    if plan.child_labels.len() < 2 {
        tracing::warn!("fission called with fewer than two children");
        return Err(PackError::Governance(
            "fission requires at least two children".to_string(),
        ));
    }

    let referenced: BTreeSet<&str> = plan
        .directives
        .iter()
        .map(|d| d.source_path.as_str())
        .collect();
    let unaccounted: Vec<&String> = source
        .files
        .keys()
        .filter(|p| !referenced.contains(p.as_str()))
        .collect();
    if !unaccounted.is_empty() {
        tracing::warn!(?unaccounted, "silent split detected");
        return Err(PackError::Governance(format!(
            "silent split: source files not referenced by any directive: {:?}",
            unaccounted
        )));
    }

    let license_carry_forward = matches!(plan.license_policy, LicensePolicy::CarryForward);
    let license = match &plan.license_policy {
        LicensePolicy::CarryForward => source.license.clone(),
        LicensePolicy::Explicit(license) => license.clone(),
    };

    let mut children_files: Vec<BTreeMap<String, Vec<u8>>> =
        vec![BTreeMap::new(); plan.child_labels.len()];
    let mut children_entries: Vec<BTreeMap<String, FileEntry>> =
        vec![BTreeMap::new(); plan.child_labels.len()];
    let mut file_mappings = Vec::new();
    let mut loss = LossSummary::default();

    for directive in &plan.directives {
        let original_size = source
            .files
            .get(&directive.source_path)
            .map(|e| e.size)
            .unwrap_or(0);

        if matches!(directive.transform, Transform::Drop) {
            loss.has_loss = true;
            loss.dropped_files.push(directive.source_path.clone());
            loss.total_bytes_lost += original_size;
            file_mappings.push(FileMapping {
                source_path: directive.source_path.clone(),
                child_index: directive.child_index,
                dest_path: directive.dest_path.clone(),
                transform: directive.transform.clone(),
            });
            continue;
        }

        if directive.child_index >= plan.child_labels.len() {
            return Err(PackError::Governance(format!(
                "directive for {} targets out-of-range child {}",
                directive.source_path, directive.child_index
            )));
        }

        let content_type = source
            .files
            .get(&directive.source_path)
            .and_then(|e| e.content_type.clone());

        let transformed = match file_bytes.get(&directive.source_path) {
            Some(bytes) => apply_transform(bytes, &directive.transform),
            None => Vec::new(),
        };

        if transformed.len() as u64 != original_size {
            loss.has_loss = true;
            loss.truncated_files.push(directive.source_path.clone());
            loss.total_bytes_lost += original_size.saturating_sub(transformed.len() as u64);
        }

        let entry = FileEntry {
            sha256: to_hex(&sha256(&transformed)),
            size: transformed.len() as u64,
            content_type,
        };
        children_entries[directive.child_index].insert(directive.dest_path.clone(), entry);
        children_files[directive.child_index].insert(directive.dest_path.clone(), transformed);

        file_mappings.push(FileMapping {
            source_path: directive.source_path.clone(),
            child_index: directive.child_index,
            dest_path: directive.dest_path.clone(),
            transform: directive.transform.clone(),
        });
    }

    let mut children = Vec::with_capacity(plan.child_labels.len());
    let mut children_manifest_ids = Vec::with_capacity(plan.child_labels.len());
    for (i, label) in plan.child_labels.iter().enumerate() {
        let manifest_id = ids::generate("RWMF");
        let mut child = Manifest {
            schema_version: source.schema_version.clone(),
            manifest_id: manifest_id.clone(),
            created_at: source.created_at.clone(),
            weaverpack_id: format!("{}-{label}", source.weaverpack_id),
            authorship: source.authorship.clone(),
            license: license.clone(),
            files: children_entries[i].clone(),
            pack_hash: String::new(),
            invariants_declared: source.invariants_declared.clone(),
            parent_manifest_id: Some(source.manifest_id.clone()),
            lineage: vec![LineageEntry {
                operation: "fission".to_string(),
                source_manifest_id: source.manifest_id.clone(),
                timestamp: source.created_at.clone(),
                receipt_ref: None,
            }],
            disclosure_tier: source.disclosure_tier.clone(),
            sensitivity: source.sensitivity.clone(),
            timebase: source.timebase.clone(),
        };
        child.pack_hash = child.compute_pack_hash();
        children_manifest_ids.push(manifest_id);
        children.push(child);
    }

    tracing::info!(
        children_manifest_ids = ?children_manifest_ids,
        has_loss = loss.has_loss,
        "fission complete"
    );

    Ok(FissionResult {
        children,
        children_files,
        lineage_map: LineageMap {
            source_manifest_id: source.manifest_id.clone(),
            children_manifest_ids,
            file_mappings,
            timebase_policy: plan.timebase_policy,
            loss_summary: loss,
            license_carry_forward,
        },
    })
}
