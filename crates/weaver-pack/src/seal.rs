//! RW-C1 + commitment: sealing never publishes a manifest, it only fixes
//! a hash-of-manifest commitment.

use serde::{Deserialize, Serialize};
use weaver_primitives::{ids, sha256, to_hex, to_wire_json};

use crate::error::PackError;
use crate::manifest::Manifest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealCommitment {
    pub commitment_id: String,
    pub manifest_id: String,
    pub weaverpack_id: String,
    pub pack_hash: String,
    pub commitment_hash: String,
    pub timestamp: String,
}

/// Recomputes `pack_hash` and fails on mismatch, then computes
/// `commitment_hash = SHA-256(wire canonical JSON of manifest)`.
#[tracing::instrument(skip(manifest, timestamp), fields(manifest_id = %manifest.manifest_id))]
pub fn seal(manifest: &Manifest, timestamp: impl Into<String>) -> Result<SealCommitment, PackError> {
    manifest.check_schema()?;
    let recomputed = manifest.compute_pack_hash();
    if recomputed != manifest.pack_hash {
        tracing::warn!(declared = %manifest.pack_hash, %recomputed, "pack_hash mismatch, refusing to seal");
        return Err(PackError::PackHashMismatch {
            declared: manifest.pack_hash.clone(),
            recomputed,
        });
    }

    let canonical = to_wire_json(manifest)?;
    let commitment_hash = to_hex(&sha256(&canonical));

    let commitment_id = ids::generate("RWSC");
    tracing::info!(%commitment_id, %commitment_hash, "manifest sealed");

    Ok(SealCommitment {
        commitment_id,
        manifest_id: manifest.manifest_id.clone(),
        weaverpack_id: manifest.weaverpack_id.clone(),
        pack_hash: manifest.pack_hash.clone(),
        commitment_hash,
        timestamp: timestamp.into(),
    })
}
