//! Container-wide constants and small value types.

pub const RWV1_MAGIC: [u8; 4] = *b"RWV1";
pub const RWV1_VERSION: u8 = 1;
pub const FLAG_RAW_SHA256_PRESENT: u8 = 0b0000_0001;

/// Known compression branches, in the fixed tie-break order used by the
/// race: `zlib < MoZlib < Bz2 < Lzma`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BranchId {
    Zlib = 0,
    MoZlib = 1,
    Bz2 = 2,
    Lzma = 3,
}

impl BranchId {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(BranchId::Zlib),
            1 => Some(BranchId::MoZlib),
            2 => Some(BranchId::Bz2),
            3 => Some(BranchId::Lzma),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Enumeration order used for tie-breaking the race: the lowest
    /// branch in this order wins among equally-sized candidates.
    pub const ALL: [BranchId; 4] = [BranchId::Zlib, BranchId::MoZlib, BranchId::Bz2, BranchId::Lzma];
}

/// Per-block diagnostics, mirroring the introspection the original
/// container exposes.
#[derive(Debug, Clone)]
pub struct BlockInfo {
    pub branch: BranchId,
    pub raw_len: u32,
    pub payload_len: u32,
}

impl BlockInfo {
    pub fn ratio(&self) -> f64 {
        if self.raw_len == 0 {
            return 1.0;
        }
        self.payload_len as f64 / self.raw_len as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContainerInfo {
    pub blocks: Vec<BlockInfo>,
    pub raw_sha256_present: bool,
}

impl ContainerInfo {
    pub fn overall_ratio(&self) -> f64 {
        let raw: u64 = self.blocks.iter().map(|b| b.raw_len as u64).sum();
        let payload: u64 = self.blocks.iter().map(|b| b.payload_len as u64).sum();
        if raw == 0 {
            return 1.0;
        }
        payload as f64 / raw as f64
    }

    pub fn branch_usage(&self) -> std::collections::BTreeMap<u8, usize> {
        let mut usage = std::collections::BTreeMap::new();
        for block in &self.blocks {
            *usage.entry(block.branch.as_u8()).or_insert(0) += 1;
        }
        usage
    }
}
