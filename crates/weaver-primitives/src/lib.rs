//! Shared primitives: hashing, canonical JSON, varints, identifiers, and
//! the WeaverPack pack-hash scheme. Leaf crate of the workspace — every
//! other crate depends on this one and nothing here depends back.

pub mod canonical;
pub mod hashing;
pub mod ids;
pub mod pack_hash;
pub mod varint;

pub use canonical::{to_pretty_json, to_wire_json, CanonicalError};
pub use hashing::{blake3, sha256, to_hex};
pub use varint::{decode_varint, encode_varint, VarintError};
