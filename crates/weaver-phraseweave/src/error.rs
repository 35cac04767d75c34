use thiserror::Error;
use weaver_primitives::VarintError;

#[derive(Debug, Error)]
pub enum PhraseWeaveError {
    #[error("truncated input")]
    Truncated,
    #[error("bad magic bytes")]
    BadMagic,
    #[error("unsupported version {0}")]
    BadVersion(u8),
    #[error("unsupported flags {0:#04x}")]
    BadFlags(u8),
    #[error("dictionary-id mismatch: stream expects {expected}, supplied dictionary is {actual}")]
    DictionaryMismatch { expected: String, actual: String },
    #[error("unknown token type {0:#04x}")]
    UnknownToken(u8),
    #[error("unknown stan-id {0}")]
    UnknownStanId(u64),
    #[error("unknown phrase-id {0}")]
    UnknownPhraseId(u64),
    #[error("phrase length {requested} exceeds stored phrase length {stored}")]
    PhraseLengthExceeded { requested: u64, stored: usize },
    #[error("repeat token with no prior expansion")]
    RepeatWithNoPriorExpansion,
    #[error("decoded output exceeds max_output_size ({limit} bytes)")]
    OutputTooLarge { limit: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("varint error: {0}")]
    Varint(#[from] VarintError),
}
