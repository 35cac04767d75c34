//! PhraseWeave: a reversible dictionary-based byte transform (PWV1) and
//! its dictionary container format (PWDC).

pub mod codec;
pub mod dictionary;
pub mod error;
pub mod types;

pub use codec::{decode, encode};
pub use dictionary::{Dictionary, DictionaryEntry, PhraseEntry};
pub use error::PhraseWeaveError;
pub use types::{DecodeConfig, EncodeConfig, Token};
