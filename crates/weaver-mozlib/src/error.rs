use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoZlibError {
    #[error("truncated payload")]
    Truncated,
    #[error("zlib compression failed: {0}")]
    Compress(std::io::Error),
    #[error("zlib decompression failed: {0}")]
    Decompress(std::io::Error),
    #[error("token {0} outside the reserved range 1..=255")]
    TokenOutOfRange(u16),
    #[error("unknown rewrite token {0}")]
    UnknownToken(u8),
}
