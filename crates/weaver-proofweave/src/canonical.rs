//! Canonicalization and hashing of proof objects.

use weaver_primitives::{blake3, sha256, to_wire_json};

use crate::error::ProofWeaveError;
use crate::types::ProofObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Blake3,
}

/// Wire-canonical JSON of a proof object: sorted keys, dense separators,
/// no trailing newline.
pub fn canonicalize_pwof(proof: &ProofObject) -> Result<Vec<u8>, ProofWeaveError> {
    Ok(to_wire_json(proof)?)
}

/// Hashes the canonical form. BLAKE3 is an opt-in tag; since the crate
/// is always linked in this workspace there is no runtime fallback path
/// to implement — callers that want SHA-256 simply pass that tag.
pub fn compute_hash(proof: &ProofObject, algorithm: HashAlgorithm) -> Result<[u8; 32], ProofWeaveError> {
    let bytes = canonicalize_pwof(proof)?;
    Ok(match algorithm {
        HashAlgorithm::Sha256 => sha256(&bytes),
        HashAlgorithm::Blake3 => blake3(&bytes),
    })
}

pub fn parse_pwof(bytes: &[u8]) -> Result<ProofObject, ProofWeaveError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Context, Formula, Goal, Proof, ProofNode, Term};

    fn sample_proof() -> ProofObject {
        ProofObject {
            pwof_version: "1".to_string(),
            ruleset_id: "PWK_ND_PROP_EQ_v1".to_string(),
            context: Context {
                assumptions: vec![Formula::Atom {
                    pred: "A".to_string(),
                    args: vec![],
                }],
            },
            goal: Goal {
                formula: Formula::Atom {
                    pred: "A".to_string(),
                    args: vec![],
                },
            },
            proof: Proof {
                nodes: vec![ProofNode {
                    id: "n1".to_string(),
                    rule: "ASSUME".to_string(),
                    premises: vec![],
                    formula: Formula::Atom {
                        pred: "A".to_string(),
                        args: vec![],
                    },
                    justification: None,
                }],
                conclusion: "n1".to_string(),
            },
            who: None,
            why: None,
        }
    }

    #[test]
    fn canonicalization_is_deterministic() {
        let p = sample_proof();
        let a = canonicalize_pwof(&p).unwrap();
        let b = canonicalize_pwof(&p).unwrap();
        assert_eq!(a, b);
        assert!(!a.ends_with(b"\n"));
    }

    #[test]
    fn sha256_and_blake3_tags_diverge() {
        let p = sample_proof();
        let sha = compute_hash(&p, HashAlgorithm::Sha256).unwrap();
        let b3 = compute_hash(&p, HashAlgorithm::Blake3).unwrap();
        assert_ne!(sha, b3);
    }

    #[test]
    fn term_roundtrips_through_json() {
        let t = Term::Fun {
            name: "f".to_string(),
            args: vec![Term::Var { name: "x".to_string() }],
        };
        let bytes = serde_json::to_vec(&t).unwrap();
        let back: Term = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(t, back);
    }
}
