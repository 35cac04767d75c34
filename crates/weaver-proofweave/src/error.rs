use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofWeaveError {
    #[error("canonicalization failed: {0}")]
    Canonical(#[from] weaver_primitives::CanonicalError),
    #[error("proof object is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
