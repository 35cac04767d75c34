//! RW-3: a non-semantic path/hash lookup over a manifest's file set.
//! Purely structural — no content indexing or search ranking, which
//! stays out of scope.

use std::collections::BTreeMap;

use crate::manifest::Manifest;

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct WeaverIndex {
    by_path: BTreeMap<String, IndexEntry>,
    by_hash: BTreeMap<String, Vec<String>>,
}

impl WeaverIndex {
    pub fn build(manifest: &Manifest) -> Self {
        let mut by_path = BTreeMap::new();
        let mut by_hash: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (path, entry) in &manifest.files {
            by_hash
                .entry(entry.sha256.clone())
                .or_default()
                .push(path.clone());
            by_path.insert(
                path.clone(),
                IndexEntry {
                    path: path.clone(),
                    sha256: entry.sha256.clone(),
                    size: entry.size,
                },
            );
        }
        WeaverIndex { by_path, by_hash }
    }

    pub fn lookup_path(&self, path: &str) -> Option<&IndexEntry> {
        self.by_path.get(path)
    }

    /// Paths sharing a sha256 with `sha256` (content duplicates).
    pub fn lookup_hash(&self, sha256: &str) -> &[String] {
        self.by_hash.get(sha256).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FileEntry;
    use weaver_primitives::{sha256, to_hex};

    fn sample_manifest() -> Manifest {
        let mut files = BTreeMap::new();
        let dup = to_hex(&sha256(b"same content"));
        files.insert(
            "a.txt".to_string(),
            FileEntry {
                sha256: dup.clone(),
                size: 12,
                content_type: None,
            },
        );
        files.insert(
            "b.txt".to_string(),
            FileEntry {
                sha256: dup,
                size: 12,
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
    fn lookup_by_path_finds_the_entry() {
        let index = WeaverIndex::build(&sample_manifest());
        assert_eq!(index.lookup_path("a.txt").unwrap().size, 12);
        assert!(index.lookup_path("missing.txt").is_none());
    }

    #[test]
    fn lookup_by_hash_finds_content_duplicates() {
        let index = WeaverIndex::build(&sample_manifest());
        let entry = index.lookup_path("a.txt").unwrap();
        let mut dupes = index.lookup_hash(&entry.sha256).to_vec();
        dupes.sort();
        assert_eq!(dupes, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }
}
