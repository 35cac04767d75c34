//! RXM1: a chunked container composing RWV1 for score/audio payloads,
//! with a monotonic tick<->frame sync map and forward-compatible
//! unknown-chunk passthrough.

pub mod container;
pub mod error;
pub mod sync;
pub mod types;

pub use container::{get_container_info, pack, unpack, Unpacked};
pub use error::RxmError;
pub use sync::{frame_to_tick, tick_to_frame, validate_sync};
pub use types::{Chunk, ChunkInfo, RxmConfig, RxmContainerInfo, RxmMetadata, SyncEntry};
