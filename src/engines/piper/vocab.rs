use std::collections::HashMap;

use super::model::PiperError;

/// Padding symbol, inserted after every phoneme.
pub const PAD: char = '_';
/// Beginning-of-sentence symbol.
pub const BOS: char = '^';
/// End-of-sentence symbol.
pub const EOS: char = '$';

/// Mapping from single phoneme characters to Piper model token ids.
#[derive(Debug, Clone)]
pub struct PhonemeIdMap {
    ids: HashMap<char, Vec<i64>>,
}

impl PhonemeIdMap {
    /// Build from the `phoneme_id_map` of a voice sidecar.
    ///
    /// Keys must be exactly one character; the `_`, `^` and `$` markers are required.
    pub fn from_config(map: &HashMap<String, Vec<i64>>) -> Result<Self, PiperError> {
        let mut ids = HashMap::with_capacity(map.len());
        for (key, value) in map {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(PiperError::Config(format!(
                        "phoneme_id_map key {key:?} is not a single character"
                    )))
                }
            };
            ids.insert(ch, value.clone());
        }

        for marker in [PAD, BOS, EOS] {
            if !ids.contains_key(&marker) {
                return Err(PiperError::Config(format!(
                    "phoneme_id_map is missing {marker:?}"
                )));
            }
        }

        Ok(Self { ids })
    }

    /// Encode phonemes as `BOS, (phoneme, PAD)*, EOS`. Unknown phonemes are skipped.
    pub fn encode(&self, phonemes: &[char]) -> Vec<i64> {
        let pad = &self.ids[&PAD];
        let mut out = self.ids[&BOS].clone();
        out.extend_from_slice(pad);
        for phoneme in phonemes {
            if let Some(ids) = self.ids.get(phoneme) {
                out.extend_from_slice(ids);
                out.extend_from_slice(pad);
            }
        }
        out.extend_from_slice(&self.ids[&EOS]);
        out
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
