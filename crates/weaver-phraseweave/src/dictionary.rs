//! PWDC: the dictionary container format and its canonical-ID binding.

use weaver_primitives::{decode_varint, encode_varint, sha256, to_hex};

use crate::error::PhraseWeaveError;
use crate::types::{PWDC_FLAG_FREQUENCY, PWDC_FLAG_PHRASES, PWDC_FLAG_WEIGHTS, PWDC_MAGIC, PWDC_VERSION};

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub stan_id: u32,
    pub raw_form: Vec<u8>,
    pub weight: Option<f32>,
    pub frequency: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhraseEntry {
    pub phrase_id: u32,
    pub stan_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    pub domain: u16,
    pub entries: Vec<DictionaryEntry>,
    pub phrases: Vec<PhraseEntry>,
}

impl Dictionary {
    pub fn new(domain: u16) -> Self {
        Self {
            domain,
            entries: Vec::new(),
            phrases: Vec::new(),
        }
    }

    pub fn entry(&self, stan_id: u64) -> Option<&DictionaryEntry> {
        self.entries
            .iter()
            .find(|e| e.stan_id as u64 == stan_id)
    }

    pub fn phrase(&self, phrase_id: u64) -> Option<&PhraseEntry> {
        self.phrases
            .iter()
            .find(|p| p.phrase_id as u64 == phrase_id)
    }

    /// SHA-256 over entries sorted by Stan-ID, each as a 4-byte BE
    /// Stan-ID, a 4-byte BE raw-form length, and the raw form bytes.
    /// Weights, frequencies, phrases, and domain are not inputs.
    pub fn compute_canonical_id(&self) -> [u8; 32] {
        let mut sorted: Vec<&DictionaryEntry> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.stan_id);
        let mut buf = Vec::new();
        for entry in sorted {
            buf.extend_from_slice(&entry.stan_id.to_be_bytes());
            buf.extend_from_slice(&(entry.raw_form.len() as u32).to_be_bytes());
            buf.extend_from_slice(&entry.raw_form);
        }
        sha256(&buf)
    }

    pub fn canonical_id_hex(&self) -> String {
        to_hex(&self.compute_canonical_id())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let has_weights = self.entries.iter().any(|e| e.weight.is_some());
        let has_frequency = self.entries.iter().any(|e| e.frequency.is_some());
        let has_phrases = !self.phrases.is_empty();

        let mut flags = 0u8;
        if has_phrases {
            flags |= PWDC_FLAG_PHRASES;
        }
        if has_weights {
            flags |= PWDC_FLAG_WEIGHTS;
        }
        if has_frequency {
            flags |= PWDC_FLAG_FREQUENCY;
        }

        let mut out = Vec::new();
        out.extend_from_slice(&PWDC_MAGIC);
        out.push(PWDC_VERSION);
        out.push(flags);
        out.extend_from_slice(&self.domain.to_be_bytes());
        out.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.compute_canonical_id());

        for entry in &self.entries {
            out.extend_from_slice(&encode_varint(entry.stan_id as u64));
            out.extend_from_slice(&encode_varint(entry.raw_form.len() as u64));
            out.extend_from_slice(&entry.raw_form);
            if has_weights {
                out.extend_from_slice(&entry.weight.unwrap_or(0.0).to_be_bytes());
            }
            if has_frequency {
                out.extend_from_slice(&entry.frequency.unwrap_or(0.0).to_be_bytes());
            }
        }

        if has_phrases {
            out.extend_from_slice(&(self.phrases.len() as u32).to_be_bytes());
            for phrase in &self.phrases {
                out.extend_from_slice(&encode_varint(phrase.phrase_id as u64));
                out.extend_from_slice(&encode_varint(phrase.stan_ids.len() as u64));
                for stan_id in &phrase.stan_ids {
                    out.extend_from_slice(&encode_varint(*stan_id as u64));
                }
            }
        }

        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhraseWeaveError> {
        if bytes.len() < 4 + 1 + 1 + 2 + 4 + 32 {
            return Err(PhraseWeaveError::Truncated);
        }
        if bytes[0..4] != PWDC_MAGIC {
            return Err(PhraseWeaveError::BadMagic);
        }
        let version = bytes[4];
        if version != PWDC_VERSION {
            return Err(PhraseWeaveError::BadVersion(version));
        }
        let flags = bytes[5];
        let known_flags = PWDC_FLAG_PHRASES | PWDC_FLAG_WEIGHTS | PWDC_FLAG_FREQUENCY;
        if flags & !known_flags != 0 {
            return Err(PhraseWeaveError::BadFlags(flags));
        }
        let has_phrases = flags & PWDC_FLAG_PHRASES != 0;
        let has_weights = flags & PWDC_FLAG_WEIGHTS != 0;
        let has_frequency = flags & PWDC_FLAG_FREQUENCY != 0;

        let domain = u16::from_be_bytes([bytes[6], bytes[7]]);
        let entry_count = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let stored_id: [u8; 32] = bytes[12..44].try_into().unwrap();

        let mut cursor = 44usize;
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let (stan_id, n) = decode_varint(&bytes[cursor..])?;
            cursor += n;
            let (len, n) = decode_varint(&bytes[cursor..])?;
            cursor += n;
            let len = len as usize;
            if cursor + len > bytes.len() {
                return Err(PhraseWeaveError::Truncated);
            }
            let raw_form = bytes[cursor..cursor + len].to_vec();
            cursor += len;

            let weight = if has_weights {
                if cursor + 4 > bytes.len() {
                    return Err(PhraseWeaveError::Truncated);
                }
                let v = f32::from_be_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
                cursor += 4;
                Some(v)
            } else {
                None
            };
            let frequency = if has_frequency {
                if cursor + 4 > bytes.len() {
                    return Err(PhraseWeaveError::Truncated);
                }
                let v = f32::from_be_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
                cursor += 4;
                Some(v)
            } else {
                None
            };

            entries.push(DictionaryEntry {
                stan_id: stan_id as u32,
                raw_form,
                weight,
                frequency,
            });
        }

        let mut phrases = Vec::new();
        if has_phrases {
            if cursor + 4 > bytes.len() {
                return Err(PhraseWeaveError::Truncated);
            }
            let phrase_count = u32::from_be_bytes(bytes[cursor..cursor + 4].try_into().unwrap());
            cursor += 4;
            for _ in 0..phrase_count {
                let (phrase_id, n) = decode_varint(&bytes[cursor..])?;
                cursor += n;
                let (stan_count, n) = decode_varint(&bytes[cursor..])?;
                cursor += n;
                let mut stan_ids = Vec::with_capacity(stan_count as usize);
                for _ in 0..stan_count {
                    let (id, n) = decode_varint(&bytes[cursor..])?;
                    cursor += n;
                    stan_ids.push(id as u32);
                }
                phrases.push(PhraseEntry {
                    phrase_id: phrase_id as u32,
                    stan_ids,
                });
            }
        }

        let dict = Dictionary {
            domain,
            entries,
            phrases,
        };
        let recomputed = dict.compute_canonical_id();
        if recomputed != stored_id {
            return Err(PhraseWeaveError::DictionaryMismatch {
                expected: to_hex(&stored_id),
                actual: to_hex(&recomputed),
            });
        }
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        let mut dict = Dictionary::new(0);
        dict.entries.push(DictionaryEntry {
            stan_id: 2,
            raw_form: b"hello".to_vec(),
            weight: None,
            frequency: None,
        });
        dict.entries.push(DictionaryEntry {
            stan_id: 1,
            raw_form: b"he".to_vec(),
            weight: None,
            frequency: None,
        });
        dict
    }

    #[test]
    fn canonical_id_is_independent_of_insertion_order() {
        let a = sample();
        let mut b = a.clone();
        b.entries.reverse();
        assert_eq!(a.compute_canonical_id(), b.compute_canonical_id());
    }

    #[test]
    fn roundtrip_through_bytes() {
        let dict = sample();
        let bytes = dict.to_bytes();
        let decoded = Dictionary::from_bytes(&bytes).unwrap();
        let mut want = dict.entries.clone();
        let mut got = decoded.entries.clone();
        want.sort_by_key(|e| e.stan_id);
        got.sort_by_key(|e| e.stan_id);
        assert_eq!(want, got);
    }

    #[test]
    fn corrupted_entry_is_rejected_on_load() {
        let dict = sample();
        let mut bytes = dict.to_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            Dictionary::from_bytes(&bytes),
            Err(PhraseWeaveError::DictionaryMismatch { .. })
        ));
    }
}
