use thiserror::Error;

#[derive(Debug, Error)]
pub enum Rwv1Error {
    #[error("truncated container")]
    Truncated,
    #[error("bad magic bytes")]
    BadMagic,
    #[error("unsupported version {0}")]
    BadVersion(u8),
    #[error("unsupported flags {0:#04x}")]
    BadFlags(u8),
    #[error("unknown branch id {0}")]
    UnknownBranch(u8),
    #[error("block decoded to {actual} bytes, expected raw_len {expected}")]
    SizeMismatch { expected: u32, actual: usize },
    #[error("whole-payload sha256 mismatch")]
    IntegrityMismatch,
    #[error("all enabled branches failed to encode this block")]
    AllBranchesFailed,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("mo+zlib branch failed: {0}")]
    MoZlib(#[from] weaver_mozlib::MoZlibError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
