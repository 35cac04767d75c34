//! RXM1 constants, chunk types, and the metadata schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const RXM1_MAGIC: [u8; 4] = *b"RXM1";
pub const RXM1_VERSION: u8 = 1;

pub const FLAG_HAS_SHA256: u8 = 0b0000_0001;
pub const FLAG_HAS_AUDIO: u8 = 0b0000_0010;
pub const FLAG_HAS_SYNC: u8 = 0b0000_0100;

pub const FOURCC_META: [u8; 4] = *b"META";
pub const FOURCC_SCOR: [u8; 4] = *b"SCOR";
pub const FOURCC_SYNC: [u8; 4] = *b"SYNC";
pub const FOURCC_AUDI: [u8; 4] = *b"AUDI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub fourcc: [u8; 4],
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncEntry {
    pub score_tick: u32,
    pub audio_frame: u32,
}

/// Metadata schema carried in the `META` chunk, sourced from the richer
/// field set the distilled container header leaves unspecified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RxmMetadata {
    pub title: Option<String>,
    pub composer: Option<String>,
    #[serde(default = "default_tempo")]
    pub tempo_bpm: f64,
    #[serde(default = "default_time_signature")]
    pub time_signature: String,
    #[serde(default = "default_key_signature")]
    pub key_signature: String,
    pub description: Option<String>,
    #[serde(default = "default_score_format")]
    pub score_format: String,
    pub audio_format: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_tempo() -> f64 {
    120.0
}
fn default_time_signature() -> String {
    "4/4".to_string()
}
fn default_key_signature() -> String {
    "C".to_string()
}
fn default_score_format() -> String {
    "midi".to_string()
}

impl Default for RxmMetadata {
    fn default() -> Self {
        Self {
            title: None,
            composer: None,
            tempo_bpm: default_tempo(),
            time_signature: default_time_signature(),
            key_signature: default_key_signature(),
            description: None,
            score_format: default_score_format(),
            audio_format: None,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RxmConfig {
    pub include_sha256: bool,
    pub rwv1: weaver_rwv1::Rwv1Config,
}

impl Default for RxmConfig {
    fn default() -> Self {
        Self {
            include_sha256: false,
            rwv1: weaver_rwv1::Rwv1Config::default(),
        }
    }
}

impl RxmConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.rwv1.validate()
    }
}

#[derive(Debug, Clone)]
pub struct ChunkInfo {
    pub fourcc: [u8; 4],
    pub len: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RxmContainerInfo {
    pub chunks: Vec<ChunkInfo>,
    pub has_sha256: bool,
    pub has_audio: bool,
    pub has_sync: bool,
}
