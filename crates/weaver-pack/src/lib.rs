//! WeaverPack: the content-addressed manifest and governance layer
//! sitting above the codec crates. Manifests are verified (RW-C1),
//! redacted (RW-C4), sealed, split (RW-C9), and merged (RW-C8) without
//! ever mutating a source; every governed operation emits a receipt
//! (RW-C7) gated by explicit preconditions (RW-C2/RW-C3).

pub mod error;
pub mod fission;
pub mod fusion;
pub mod governance;
pub mod index;
pub mod manifest;
pub mod receipt;
pub mod redact;
pub mod seal;
pub mod verify;

pub use error::PackError;
pub use manifest::{FileEntry, LineageEntry, Manifest, Sensitivity, Timebase};
