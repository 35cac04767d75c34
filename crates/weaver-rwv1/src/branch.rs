//! Per-branch encode/decode. Each function is self-contained and never
//! touches the container header — `container.rs` owns framing.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::config::Rwv1Config;
use crate::error::Rwv1Error;
use crate::types::BranchId;

pub fn encode(branch: BranchId, block: &[u8], cfg: &Rwv1Config) -> Result<Vec<u8>, Rwv1Error> {
    match branch {
        BranchId::Zlib => zlib_encode(block, cfg.zlib_level),
        BranchId::MoZlib => Ok(weaver_mozlib::mo_zlib_encode(
            block,
            cfg.mo_max_entries,
            cfg.zlib_level,
        )?),
        BranchId::Bz2 => bz2_encode(block, cfg.bz2_level),
        BranchId::Lzma => lzma_encode(block, cfg.lzma_preset),
    }
}

pub fn decode(branch: BranchId, payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    match branch {
        BranchId::Zlib => zlib_decode(payload),
        BranchId::MoZlib => Ok(weaver_mozlib::mo_zlib_decode(payload)?),
        BranchId::Bz2 => bz2_decode(payload),
        BranchId::Lzma => lzma_decode(payload),
    }
}

fn zlib_encode(block: &[u8], level: u32) -> Result<Vec<u8>, Rwv1Error> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(block)?;
    Ok(encoder.finish()?)
}

fn zlib_decode(payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(feature = "bz2")]
fn bz2_encode(block: &[u8], level: u32) -> Result<Vec<u8>, Rwv1Error> {
    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    let mut encoder = BzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(block)?;
    Ok(encoder.finish()?)
}

#[cfg(not(feature = "bz2"))]
fn bz2_encode(_block: &[u8], _level: u32) -> Result<Vec<u8>, Rwv1Error> {
    Err(Rwv1Error::UnknownBranch(BranchId::Bz2.as_u8()))
}

#[cfg(feature = "bz2")]
fn bz2_decode(payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    use bzip2::read::BzDecoder;
    let mut decoder = BzDecoder::new(payload);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(not(feature = "bz2"))]
fn bz2_decode(_payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    Err(Rwv1Error::UnknownBranch(BranchId::Bz2.as_u8()))
}

#[cfg(feature = "lzma")]
fn lzma_encode(block: &[u8], preset: u32) -> Result<Vec<u8>, Rwv1Error> {
    use xz2::write::XzEncoder;
    let mut encoder = XzEncoder::new(Vec::new(), preset);
    encoder.write_all(block)?;
    Ok(encoder.finish()?)
}

#[cfg(not(feature = "lzma"))]
fn lzma_encode(_block: &[u8], _preset: u32) -> Result<Vec<u8>, Rwv1Error> {
    Err(Rwv1Error::UnknownBranch(BranchId::Lzma.as_u8()))
}

#[cfg(feature = "lzma")]
fn lzma_decode(payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    use xz2::read::XzDecoder;
    let mut decoder = XzDecoder::new(payload);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(not(feature = "lzma"))]
fn lzma_decode(_payload: &[u8]) -> Result<Vec<u8>, Rwv1Error> {
    Err(Rwv1Error::UnknownBranch(BranchId::Lzma.as_u8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zlib_roundtrips() {
        let data = b"hello hello hello hello world".to_vec();
        let cfg = Rwv1Config::default();
        let payload = encode(BranchId::Zlib, &data, &cfg).unwrap();
        let decoded = decode(BranchId::Zlib, &payload).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn mo_zlib_roundtrips() {
        let data = b"hello hello hello hello world".to_vec();
        let cfg = Rwv1Config::default();
        let payload = encode(BranchId::MoZlib, &data, &cfg).unwrap();
        let decoded = decode(BranchId::MoZlib, &payload).unwrap();
        assert_eq!(decoded, data);
    }
}
