//! WeaverPack manifest: a content-addressed file set plus governance
//! metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use weaver_primitives::{pack_hash, to_hex};

use crate::error::PackError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub sha256: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Sensitivity {
    #[serde(default)]
    pub redacted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Timebase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineageEntry {
    pub operation: String,
    pub source_manifest_id: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub schema_version: String,
    pub manifest_id: String,
    pub created_at: String,
    pub weaverpack_id: String,
    pub authorship: String,
    pub license: String,
    pub files: BTreeMap<String, FileEntry>,
    pub pack_hash: String,
    pub invariants_declared: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_manifest_id: Option<String>,
    #[serde(default)]
    pub lineage: Vec<LineageEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosure_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Sensitivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timebase: Option<Timebase>,
}

impl Manifest {
    /// Recomputes I3's pack-hash over `files`.
    pub fn compute_pack_hash(&self) -> String {
        let shas: BTreeMap<String, String> = self
            .files
            .iter()
            .map(|(path, entry)| (path.clone(), entry.sha256.clone()))
            .collect();
        to_hex(&pack_hash::compute(&shas))
    }

    /// Checks required fields are non-empty without touching disk.
    pub fn check_schema(&self) -> Result<(), PackError> {
        if self.schema_version.is_empty() {
            return Err(PackError::MissingField("schema_version"));
        }
        if self.manifest_id.is_empty() {
            return Err(PackError::MissingField("manifest_id"));
        }
        if self.weaverpack_id.is_empty() {
            return Err(PackError::MissingField("weaverpack_id"));
        }
        if self.pack_hash.is_empty() {
            return Err(PackError::MissingField("pack_hash"));
        }
        Ok(())
    }
}
