use thiserror::Error;

#[derive(Debug, Error)]
pub enum RxmError {
    #[error("truncated container")]
    Truncated,
    #[error("bad magic bytes")]
    BadMagic,
    #[error("unsupported version {0}")]
    BadVersion(u8),
    #[error("unsupported flags {0:#04x}")]
    BadFlags(u8),
    #[error("chunk FourCC must be exactly 4 bytes, got {0}")]
    BadFourCc(usize),
    #[error("missing required chunk {0}")]
    MissingChunk(&'static str),
    #[error("whole-payload sha256 mismatch")]
    IntegrityMismatch,
    #[error("sync entry {index} is not strictly increasing over its predecessor")]
    NonMonotonicSync { index: usize },
    #[error("metadata chunk is not valid UTF-8/JSON: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("nested rwv1 container error: {0}")]
    Rwv1(#[from] weaver_rwv1::Rwv1Error),
}
