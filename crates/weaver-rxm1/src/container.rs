//! RXM1: a chunked FourCC container that composes RWV1 for score/audio
//! payloads and carries a monotonic tick<->frame sync map.

use weaver_primitives::sha256;

use crate::error::RxmError;
use crate::types::{
    Chunk, ChunkInfo, RxmConfig, RxmContainerInfo, RxmMetadata, SyncEntry, FLAG_HAS_AUDIO,
    FLAG_HAS_SHA256, FLAG_HAS_SYNC, FOURCC_AUDI, FOURCC_META, FOURCC_SCOR, FOURCC_SYNC, RXM1_MAGIC,
    RXM1_VERSION,
};

pub struct Unpacked {
    pub meta: RxmMetadata,
    pub score: Vec<u8>,
    pub audio: Option<Vec<u8>>,
    pub sync: Option<Vec<SyncEntry>>,
    pub extra_chunks: Vec<Chunk>,
}

fn encode_chunk(fourcc: [u8; 4], body: &[u8]) -> Result<Vec<u8>, RxmError> {
    if fourcc.len() != 4 {
        return Err(RxmError::BadFourCc(fourcc.len()));
    }
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(&fourcc);
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    Ok(out)
}

fn encode_sync(entries: &[SyncEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        out.extend_from_slice(&e.score_tick.to_be_bytes());
        out.extend_from_slice(&e.audio_frame.to_be_bytes());
    }
    out
}

fn decode_sync(body: &[u8]) -> Result<Vec<SyncEntry>, RxmError> {
    if body.len() < 4 {
        return Err(RxmError::Truncated);
    }
    let count = u32::from_be_bytes(body[0..4].try_into().unwrap()) as usize;
    let mut cursor = 4;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        if cursor + 8 > body.len() {
            return Err(RxmError::Truncated);
        }
        let score_tick = u32::from_be_bytes(body[cursor..cursor + 4].try_into().unwrap());
        let audio_frame = u32::from_be_bytes(body[cursor + 4..cursor + 8].try_into().unwrap());
        cursor += 8;
        entries.push(SyncEntry { score_tick, audio_frame });
    }
    Ok(entries)
}

/// Packs a musical artifact. Score and audio bytes are compressed via
/// RWV1 with `include_sha256=false` — RXM1 owns the whole-container
/// integrity envelope.
pub fn pack(
    meta: &RxmMetadata,
    score: &[u8],
    audio: Option<&[u8]>,
    sync: Option<&[SyncEntry]>,
    extra_chunks: &[Chunk],
    cfg: &RxmConfig,
) -> Result<Vec<u8>, RxmError> {
    cfg.validate().map_err(weaver_rwv1::Rwv1Error::InvalidConfig)?;
    if let Some(entries) = sync {
        crate::sync::validate_sync(entries)?;
    }

    let mut rwv1_cfg = cfg.rwv1.clone();
    rwv1_cfg.include_sha256 = false;

    let meta_json = serde_json::to_vec(meta)?;
    let scor_body = weaver_rwv1::compress_bytes(score, &rwv1_cfg)?;

    let mut chunk_bodies: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    chunk_bodies.push((FOURCC_META, meta_json));
    chunk_bodies.push((FOURCC_SCOR, scor_body));
    if let Some(entries) = sync {
        chunk_bodies.push((FOURCC_SYNC, encode_sync(entries)));
    }
    if let Some(audio_bytes) = audio {
        let audi_body = weaver_rwv1::compress_bytes(audio_bytes, &rwv1_cfg)?;
        chunk_bodies.push((FOURCC_AUDI, audi_body));
    }
    for chunk in extra_chunks {
        chunk_bodies.push((chunk.fourcc, chunk.body.clone()));
    }

    let mut flags = 0u8;
    if cfg.include_sha256 {
        flags |= FLAG_HAS_SHA256;
    }
    if audio.is_some() {
        flags |= FLAG_HAS_AUDIO;
    }
    if sync.is_some() {
        flags |= FLAG_HAS_SYNC;
    }

    let mut out = Vec::new();
    out.extend_from_slice(&RXM1_MAGIC);
    out.push(RXM1_VERSION);
    out.push(flags);
    out.extend_from_slice(&(chunk_bodies.len() as u16).to_be_bytes());
    if cfg.include_sha256 {
        let mut concat = Vec::new();
        for (_, body) in &chunk_bodies {
            concat.extend_from_slice(body);
        }
        out.extend_from_slice(&sha256(&concat));
    }
    for (fourcc, body) in &chunk_bodies {
        out.extend_from_slice(&encode_chunk(*fourcc, body)?);
    }

    Ok(out)
}

/// Unpacks a container produced by [`pack`]. Chunks with an unrecognized
/// FourCC are preserved verbatim, in the order encountered, and never
/// interpreted.
pub fn unpack(container: &[u8]) -> Result<Unpacked, RxmError> {
    if container.len() < 8 {
        return Err(RxmError::Truncated);
    }
    if container[0..4] != RXM1_MAGIC {
        return Err(RxmError::BadMagic);
    }
    let version = container[4];
    if version != RXM1_VERSION {
        return Err(RxmError::BadVersion(version));
    }
    let flags = container[5];
    let known_flags = FLAG_HAS_SHA256 | FLAG_HAS_AUDIO | FLAG_HAS_SYNC;
    if flags & !known_flags != 0 {
        return Err(RxmError::BadFlags(flags));
    }
    let has_audio = flags & FLAG_HAS_AUDIO != 0;
    let has_sync = flags & FLAG_HAS_SYNC != 0;
    let chunk_count = u16::from_be_bytes([container[6], container[7]]);

    let mut cursor = 8usize;
    let stored_sha256 = if flags & FLAG_HAS_SHA256 != 0 {
        if container.len() < cursor + 32 {
            return Err(RxmError::Truncated);
        }
        let hash: [u8; 32] = container[cursor..cursor + 32].try_into().unwrap();
        cursor += 32;
        Some(hash)
    } else {
        None
    };

    let mut meta: Option<RxmMetadata> = None;
    let mut score: Option<Vec<u8>> = None;
    let mut audio: Option<Vec<u8>> = None;
    let mut sync: Option<Vec<SyncEntry>> = None;
    let mut extra_chunks = Vec::new();
    let mut concat = Vec::new();

    for _ in 0..chunk_count {
        if cursor + 8 > container.len() {
            return Err(RxmError::Truncated);
        }
        let fourcc: [u8; 4] = container[cursor..cursor + 4].try_into().unwrap();
        cursor += 4;
        let len = u32::from_be_bytes(container[cursor..cursor + 4].try_into().unwrap()) as usize;
        cursor += 4;
        if cursor + len > container.len() {
            return Err(RxmError::Truncated);
        }
        let body = &container[cursor..cursor + len];
        cursor += len;
        concat.extend_from_slice(body);

        match fourcc {
            FOURCC_META => meta = Some(serde_json::from_slice(body)?),
            FOURCC_SCOR => score = Some(weaver_rwv1::decompress_bytes(body)?),
            FOURCC_SYNC => sync = Some(decode_sync(body)?),
            FOURCC_AUDI => audio = Some(weaver_rwv1::decompress_bytes(body)?),
            other => extra_chunks.push(Chunk {
                fourcc: other,
                body: body.to_vec(),
            }),
        }
    }

    if let Some(expected) = stored_sha256 {
        if sha256(&concat) != expected {
            return Err(RxmError::IntegrityMismatch);
        }
    }

    let meta = meta.ok_or(RxmError::MissingChunk("META"))?;
    let score = score.ok_or(RxmError::MissingChunk("SCOR"))?;
    if has_audio && audio.is_none() {
        return Err(RxmError::MissingChunk("AUDI"));
    }
    if has_audio && sync.is_none() {
        return Err(RxmError::MissingChunk("SYNC"));
    }
    if let Some(entries) = &sync {
        crate::sync::validate_sync(entries)?;
    }

    Ok(Unpacked {
        meta,
        score,
        audio,
        sync,
        extra_chunks,
    })
}

/// Dry validation: parses the container and reports accumulated errors
/// instead of failing on the first one.
pub fn validate_container(container: &[u8]) -> (bool, Vec<String>) {
    match unpack(container) {
        Ok(_) => (true, Vec::new()),
        Err(e) => (false, vec![e.to_string()]),
    }
}

pub fn get_container_info(container: &[u8]) -> Result<RxmContainerInfo, RxmError> {
    if container.len() < 8 {
        return Err(RxmError::Truncated);
    }
    if container[0..4] != RXM1_MAGIC {
        return Err(RxmError::BadMagic);
    }
    let flags = container[5];
    let chunk_count = u16::from_be_bytes([container[6], container[7]]);
    let mut cursor = 8usize;
    if flags & FLAG_HAS_SHA256 != 0 {
        cursor += 32;
    }
    let mut chunks = Vec::new();
    for _ in 0..chunk_count {
        if cursor + 8 > container.len() {
            return Err(RxmError::Truncated);
        }
        let fourcc: [u8; 4] = container[cursor..cursor + 4].try_into().unwrap();
        cursor += 4;
        let len = u32::from_be_bytes(container[cursor..cursor + 4].try_into().unwrap());
        cursor += 4 + len as usize;
        chunks.push(ChunkInfo { fourcc, len });
    }
    Ok(RxmContainerInfo {
        chunks,
        has_sha256: flags & FLAG_HAS_SHA256 != 0,
        has_audio: flags & FLAG_HAS_AUDIO != 0,
        has_sync: flags & FLAG_HAS_SYNC != 0,
    })
}
