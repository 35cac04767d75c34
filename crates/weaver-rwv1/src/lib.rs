//! RWV1: a block-structured, race-compressed container. Branches are
//! tried per block and the smallest payload wins a deterministic
//! tie-break.

pub mod branch;
pub mod config;
pub mod container;
pub mod error;
pub mod types;

pub use config::Rwv1Config;
pub use container::{compress_bytes, decompress_bytes, get_container_info};
pub use error::Rwv1Error;
pub use types::{BlockInfo, BranchId, ContainerInfo};
