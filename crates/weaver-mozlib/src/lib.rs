//! MO+zlib: a per-block "middle-out" dictionary rewrite followed by zlib.
//! Self-contained within a single RWV1 block — the dictionary never
//! crosses a block boundary.

pub mod error;

use std::collections::HashMap;
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

pub use error::MoZlibError;

/// Token `0` is reserved for the literal-byte escape; tokens `1..=255`
/// name dictionary phrases.
pub const TOKEN_RAW: u8 = 0;
pub const TOKEN_BASE: u8 = 1;
pub const TOKEN_MAX: u8 = 255;

struct DictEntry {
    token: u8,
    phrase: Vec<u8>,
}

/// Counts substrings of length `k` in `[3, min(64, block.len())]`
/// appearing at least twice, scores each `count * (length - 1)`, and
/// returns the top `min(max_entries, 255)` by descending score (ties
/// broken by longer length, then lexicographically by phrase bytes).
fn discover_phrases(block: &[u8], max_entries: usize) -> Vec<Vec<u8>> {
    if block.is_empty() {
        return Vec::new();
    }
    let max_k = 64.min(block.len());
    if max_k < 3 {
        return Vec::new();
    }

    let mut counts: HashMap<&[u8], usize> = HashMap::new();
    for k in 3..=max_k {
        if k > block.len() {
            break;
        }
        for window in block.windows(k) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }

    let mut candidates: Vec<(&[u8], usize)> =
        counts.into_iter().filter(|(_, count)| *count >= 2).collect();

    candidates.sort_by(|(a_bytes, a_count), (b_bytes, b_count)| {
        let score_a = a_count * (a_bytes.len() - 1);
        let score_b = b_count * (b_bytes.len() - 1);
        score_b
            .cmp(&score_a)
            .then(b_bytes.len().cmp(&a_bytes.len()))
            .then(a_bytes.cmp(b_bytes))
    });

    let cap = max_entries.min(255).min(candidates.len());
    candidates
        .into_iter()
        .take(cap)
        .map(|(bytes, _)| bytes.to_vec())
        .collect()
}

fn assign_tokens(phrases: Vec<Vec<u8>>) -> Vec<DictEntry> {
    phrases
        .into_iter()
        .enumerate()
        .map(|(i, phrase)| DictEntry {
            token: TOKEN_BASE + i as u8,
            phrase,
        })
        .collect()
}

/// Rewrites `block` into a token stream: `0x00` followed by a raw byte
/// for an unmatched position, or a single dictionary token byte for a
/// matched phrase. Matching tries candidates in descending phrase
/// length (ties broken by ascending token) so the longest available
/// match always wins.
fn rewrite_to_tokens(block: &[u8], dict: &[DictEntry]) -> Vec<u8> {
    let mut by_length: Vec<&DictEntry> = dict.iter().collect();
    by_length.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()).then(a.token.cmp(&b.token)));

    let mut out = Vec::with_capacity(block.len());
    let mut i = 0usize;
    while i < block.len() {
        let mut matched = None;
        for entry in &by_length {
            let len = entry.phrase.len();
            if i + len <= block.len() && &block[i..i + len] == entry.phrase.as_slice() {
                matched = Some((entry.token, len));
                break;
            }
        }
        match matched {
            Some((token, len)) => {
                out.push(token);
                i += len;
            }
            None => {
                out.push(TOKEN_RAW);
                out.push(block[i]);
                i += 1;
            }
        }
    }
    out
}

fn rewrite_from_tokens(tokens: &[u8], dict: &HashMap<u8, Vec<u8>>) -> Result<Vec<u8>, MoZlibError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0usize;
    while i < tokens.len() {
        let token = tokens[i];
        if token == TOKEN_RAW {
            i += 1;
            if i >= tokens.len() {
                return Err(MoZlibError::Truncated);
            }
            out.push(tokens[i]);
            i += 1;
        } else {
            let phrase = dict.get(&token).ok_or(MoZlibError::UnknownToken(token))?;
            out.extend_from_slice(phrase);
            i += 1;
        }
    }
    Ok(out)
}

/// Encodes one block with MO+zlib. `max_entries` bounds the discovered
/// dictionary before the 255-token ceiling; `zlib_level` is `1..=9`.
pub fn mo_zlib_encode(block: &[u8], max_entries: usize, zlib_level: u32) -> Result<Vec<u8>, MoZlibError> {
    let phrases = discover_phrases(block, max_entries);
    let dict = assign_tokens(phrases);
    let tokens = rewrite_to_tokens(block, &dict);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(zlib_level));
    encoder.write_all(&tokens).map_err(MoZlibError::Compress)?;
    let compressed = encoder.finish().map_err(MoZlibError::Compress)?;

    let mut sorted_dict: Vec<&DictEntry> = dict.iter().collect();
    sorted_dict.sort_by_key(|e| e.token);

    let mut out = Vec::new();
    out.extend_from_slice(&(sorted_dict.len() as u16).to_be_bytes());
    for entry in &sorted_dict {
        out.push(entry.token);
        out.extend_from_slice(&(entry.phrase.len() as u16).to_be_bytes());
        out.extend_from_slice(&entry.phrase);
    }
    out.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Decodes a payload produced by [`mo_zlib_encode`].
pub fn mo_zlib_decode(payload: &[u8]) -> Result<Vec<u8>, MoZlibError> {
    if payload.len() < 2 {
        return Err(MoZlibError::Truncated);
    }
    let dict_count = u16::from_be_bytes([payload[0], payload[1]]);
    let mut cursor = 2usize;
    let mut dict = HashMap::new();
    for _ in 0..dict_count {
        if cursor + 1 + 2 > payload.len() {
            return Err(MoZlibError::Truncated);
        }
        let token = payload[cursor];
        cursor += 1;
        let len = u16::from_be_bytes([payload[cursor], payload[cursor + 1]]) as usize;
        cursor += 2;
        if cursor + len > payload.len() {
            return Err(MoZlibError::Truncated);
        }
        let phrase = payload[cursor..cursor + len].to_vec();
        cursor += len;
        dict.insert(token, phrase);
    }

    if cursor + 4 > payload.len() {
        return Err(MoZlibError::Truncated);
    }
    let comp_len = u32::from_be_bytes(payload[cursor..cursor + 4].try_into().unwrap()) as usize;
    cursor += 4;
    if cursor + comp_len > payload.len() {
        return Err(MoZlibError::Truncated);
    }
    let compressed = &payload[cursor..cursor + comp_len];

    let mut decoder = ZlibDecoder::new(compressed);
    let mut tokens = Vec::new();
    decoder
        .read_to_end(&mut tokens)
        .map_err(MoZlibError::Decompress)?;

    rewrite_from_tokens(&tokens, &dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_block_roundtrips() {
        let payload = mo_zlib_encode(b"", 200, 6).unwrap();
        let decoded = mo_zlib_decode(&payload).unwrap();
        assert_eq!(decoded, b"".to_vec());
    }

    #[test]
    fn repetitive_block_roundtrips_and_uses_a_dictionary() {
        let block = b"abcabcabcabcabcabcabcabcabcabc".repeat(4);
        let payload = mo_zlib_encode(&block, 200, 6).unwrap();
        let dict_count = u16::from_be_bytes([payload[0], payload[1]]);
        assert!(dict_count > 0);
        let decoded = mo_zlib_decode(&payload).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn dictionary_never_exceeds_255_entries() {
        let mut block = Vec::new();
        for i in 0..2000u32 {
            block.extend_from_slice(&i.to_le_bytes());
        }
        let payload = mo_zlib_encode(&block, 1000, 6).unwrap();
        let dict_count = u16::from_be_bytes([payload[0], payload[1]]);
        assert!(dict_count <= 255);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn roundtrip_any_bytes(block in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let payload = mo_zlib_encode(&block, 200, 6).unwrap();
            let decoded = mo_zlib_decode(&payload).unwrap();
            prop_assert_eq!(decoded, block);
        }
    }
}
