use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("manifest is missing required field {0}")]
    MissingField(&'static str),
    #[error("governance violation: {0}")]
    Governance(String),
    #[error("pack_hash mismatch: recomputed {recomputed}, manifest declares {declared}")]
    PackHashMismatch { declared: String, recomputed: String },
    #[error("regex pattern is invalid: {0}")]
    Regex(#[from] regex::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid gate status {0:?}")]
    InvalidGateStatus(String),
}
