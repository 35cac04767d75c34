use crate::types::BranchId;

pub const MIN_BLOCK_SIZE: u32 = 1024;
pub const MAX_BLOCK_SIZE: u32 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Rwv1Config {
    pub block_size: u32,
    pub zlib_level: u32,
    pub bz2_level: u32,
    pub lzma_preset: u32,
    pub mo_max_entries: usize,
    pub probe: bool,
    pub include_sha256: bool,
    pub enable_zlib: bool,
    pub enable_mo_zlib: bool,
    pub enable_bz2: bool,
    pub enable_lzma: bool,
}

impl Default for Rwv1Config {
    fn default() -> Self {
        Self {
            block_size: 1024 * 1024,
            zlib_level: 9,
            bz2_level: 9,
            lzma_preset: 6,
            mo_max_entries: 200,
            probe: false,
            include_sha256: false,
            enable_zlib: true,
            enable_mo_zlib: true,
            enable_bz2: false,
            enable_lzma: false,
        }
    }
}

impl Rwv1Config {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            return Err(format!(
                "block_size must be in [{MIN_BLOCK_SIZE}, {MAX_BLOCK_SIZE}]"
            ));
        }
        if !(1..=9).contains(&self.zlib_level) {
            return Err("zlib_level must be in [1, 9]".to_string());
        }
        if !(1..=9).contains(&self.bz2_level) {
            return Err("bz2_level must be in [1, 9]".to_string());
        }
        if self.lzma_preset > 9 {
            return Err("lzma_preset must be in [0, 9]".to_string());
        }
        if self.mo_max_entries < 1 {
            return Err("mo_max_entries must be >= 1".to_string());
        }
        if self.enabled_branches().is_empty() {
            return Err("at least one branch must be enabled".to_string());
        }
        Ok(())
    }

    /// Branches this configuration enables, intersected with whichever
    /// optional codecs were compiled in.
    pub fn enabled_branches(&self) -> Vec<BranchId> {
        let mut branches = Vec::new();
        if self.enable_zlib {
            branches.push(BranchId::Zlib);
        }
        if self.enable_mo_zlib {
            branches.push(BranchId::MoZlib);
        }
        if self.enable_bz2 && cfg!(feature = "bz2") {
            branches.push(BranchId::Bz2);
        }
        if self.enable_lzma && cfg!(feature = "lzma") {
            branches.push(BranchId::Lzma);
        }
        branches
    }
}
