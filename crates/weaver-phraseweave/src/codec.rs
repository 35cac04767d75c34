//! PWV1 encoder and decoder.

use weaver_primitives::{decode_varint, encode_varint};

use crate::dictionary::Dictionary;
use crate::error::PhraseWeaveError;
use crate::types::{DecodeConfig, EncodeConfig, Token, PWV1_HEADER_LEN, PWV1_MAGIC, PWV1_VERSION};

/// One dictionary entry eligible for matching, pre-filtered by length
/// bounds and pre-sorted by the tie-break order: longer length first,
/// then lower Stan-ID.
struct MatchCandidate<'a> {
    stan_id: u32,
    raw_form: &'a [u8],
}

fn build_match_candidates(dict: &Dictionary, cfg: &EncodeConfig) -> Vec<MatchCandidate<'_>> {
    let mut candidates: Vec<MatchCandidate<'_>> = dict
        .entries
        .iter()
        .filter(|e| {
            let len = e.raw_form.len();
            len >= cfg.min_phrase_len && len <= cfg.max_phrase_len
        })
        .map(|e| MatchCandidate {
            stan_id: e.stan_id,
            raw_form: &e.raw_form,
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.raw_form
            .len()
            .cmp(&a.raw_form.len())
            .then(a.stan_id.cmp(&b.stan_id))
    });
    candidates
}

/// Encodes `input` against `dict`. Never emits PHRASE or REPEAT tokens —
/// those are reserved for decoder support and future producers.
pub fn encode(
    input: &[u8],
    dict: &Dictionary,
    cfg: &EncodeConfig,
) -> Result<Vec<u8>, PhraseWeaveError> {
    cfg.validate().map_err(PhraseWeaveError::InvalidConfig)?;

    let mut out = Vec::with_capacity(PWV1_HEADER_LEN + input.len());
    out.extend_from_slice(&PWV1_MAGIC);
    out.push(PWV1_VERSION);
    out.push(0x00);
    out.extend_from_slice(&dict.compute_canonical_id());

    let candidates = if cfg.greedy {
        build_match_candidates(dict, cfg)
    } else {
        Vec::new()
    };

    let mut i = 0usize;
    while i < input.len() {
        let mut matched = None;
        if cfg.greedy {
            for candidate in &candidates {
                let len = candidate.raw_form.len();
                if i + len <= input.len() && &input[i..i + len] == candidate.raw_form {
                    matched = Some((candidate.stan_id, len));
                    break;
                }
            }
        }
        match matched {
            Some((stan_id, len)) => {
                out.push(Token::Stan(stan_id as u64).type_byte());
                out.extend_from_slice(&encode_varint(stan_id as u64));
                i += len;
            }
            None => {
                out.push(Token::Literal(input[i]).type_byte());
                out.push(input[i]);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Decodes a PWV1 stream against `dict`.
pub fn decode(
    stream: &[u8],
    dict: &Dictionary,
    cfg: &DecodeConfig,
) -> Result<Vec<u8>, PhraseWeaveError> {
    if stream.len() < PWV1_HEADER_LEN {
        return Err(PhraseWeaveError::Truncated);
    }
    if stream[0..4] != PWV1_MAGIC {
        return Err(PhraseWeaveError::BadMagic);
    }
    let version = stream[4];
    if version != PWV1_VERSION {
        return Err(PhraseWeaveError::BadVersion(version));
    }
    let flags = stream[5];
    if flags != 0x00 {
        return Err(PhraseWeaveError::BadFlags(flags));
    }
    let stream_dict_id: [u8; 32] = stream[6..38].try_into().unwrap();
    let dict_id = dict.compute_canonical_id();
    if stream_dict_id != dict_id {
        return Err(PhraseWeaveError::DictionaryMismatch {
            expected: weaver_primitives::to_hex(&stream_dict_id),
            actual: weaver_primitives::to_hex(&dict_id),
        });
    }

    let mut out = Vec::new();
    let mut last_expansion: Option<Vec<u8>> = None;
    let mut cursor = PWV1_HEADER_LEN;

    let check_limit = |out: &Vec<u8>| -> Result<(), PhraseWeaveError> {
        if let Some(limit) = cfg.max_output_size {
            if out.len() > limit {
                return Err(PhraseWeaveError::OutputTooLarge { limit });
            }
        }
        Ok(())
    };

    while cursor < stream.len() {
        let type_byte = stream[cursor];
        cursor += 1;
        match type_byte {
            0x00 => {
                if cursor >= stream.len() {
                    return Err(PhraseWeaveError::Truncated);
                }
                let byte = stream[cursor];
                cursor += 1;
                out.push(byte);
                last_expansion = Some(vec![byte]);
            }
            0x01 => {
                let (stan_id, n) = decode_varint(&stream[cursor..])?;
                cursor += n;
                let entry = dict
                    .entry(stan_id)
                    .ok_or(PhraseWeaveError::UnknownStanId(stan_id))?;
                out.extend_from_slice(&entry.raw_form);
                last_expansion = Some(entry.raw_form.clone());
            }
            0x02 => {
                let (phrase_id, n) = decode_varint(&stream[cursor..])?;
                cursor += n;
                let (length, n) = decode_varint(&stream[cursor..])?;
                cursor += n;
                let phrase = dict
                    .phrase(phrase_id)
                    .ok_or(PhraseWeaveError::UnknownPhraseId(phrase_id))?;
                if length as usize > phrase.stan_ids.len() {
                    return Err(PhraseWeaveError::PhraseLengthExceeded {
                        requested: length,
                        stored: phrase.stan_ids.len(),
                    });
                }
                let mut expansion = Vec::new();
                for stan_id in &phrase.stan_ids[..length as usize] {
                    let entry = dict
                        .entry(*stan_id as u64)
                        .ok_or(PhraseWeaveError::UnknownStanId(*stan_id as u64))?;
                    expansion.extend_from_slice(&entry.raw_form);
                }
                out.extend_from_slice(&expansion);
                last_expansion = Some(expansion);
            }
            0x03 => {
                let (count, n) = decode_varint(&stream[cursor..])?;
                cursor += n;
                let expansion = last_expansion
                    .clone()
                    .ok_or(PhraseWeaveError::RepeatWithNoPriorExpansion)?;
                for _ in 0..count {
                    out.extend_from_slice(&expansion);
                }
            }
            other => return Err(PhraseWeaveError::UnknownToken(other)),
        }
        check_limit(&out)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryEntry;

    fn entry(stan_id: u32, raw: &[u8]) -> DictionaryEntry {
        DictionaryEntry {
            stan_id,
            raw_form: raw.to_vec(),
            weight: None,
            frequency: None,
        }
    }

    #[test]
    fn empty_roundtrip_matches_the_pinned_bytes() {
        let dict = Dictionary::new(0);
        let encoded = encode(b"", &dict, &EncodeConfig::default()).unwrap();
        let mut expected = vec![0x50, 0x57, 0x56, 0x31, 0x01, 0x00];
        expected.extend_from_slice(&[
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55,
        ]);
        assert_eq!(encoded, expected);
        assert_eq!(encoded.len(), 38);
        let decoded = decode(&encoded, &dict, &DecodeConfig::default()).unwrap();
        assert_eq!(decoded, b"".to_vec());
    }

    #[test]
    fn greedy_prefers_the_longer_match() {
        let mut dict = Dictionary::new(0);
        dict.entries.push(entry(1, b"he"));
        dict.entries.push(entry(2, b"hello"));
        let encoded = encode(b"hello", &dict, &EncodeConfig::default()).unwrap();
        // header + one STAN token (type byte + one-byte varint stan-id 2)
        assert_eq!(encoded.len(), 38 + 2);
        assert_eq!(encoded[38], 0x01);
        assert_eq!(encoded[39], 0x02);
        let decoded = decode(&encoded, &dict, &DecodeConfig::default()).unwrap();
        assert_eq!(decoded, b"hello".to_vec());
    }

    #[test]
    fn unknown_stan_id_on_decode_fails() {
        let dict = Dictionary::new(0);
        let mut stream = Vec::new();
        stream.extend_from_slice(&PWV1_MAGIC);
        stream.push(PWV1_VERSION);
        stream.push(0x00);
        stream.extend_from_slice(&dict.compute_canonical_id());
        stream.push(0x01);
        stream.extend_from_slice(&encode_varint(7));
        let err = decode(&stream, &dict, &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, PhraseWeaveError::UnknownStanId(7)));
    }

    #[test]
    fn repeat_with_no_prior_expansion_fails() {
        let dict = Dictionary::new(0);
        let mut stream = Vec::new();
        stream.extend_from_slice(&PWV1_MAGIC);
        stream.push(PWV1_VERSION);
        stream.push(0x00);
        stream.extend_from_slice(&dict.compute_canonical_id());
        stream.push(0x03);
        stream.extend_from_slice(&encode_varint(1));
        let err = decode(&stream, &dict, &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, PhraseWeaveError::RepeatWithNoPriorExpansion));
    }
}
