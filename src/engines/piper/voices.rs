use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::PiperError;

/// Voice model used when none is given.
pub const DEFAULT_MODEL: &str = "voices/en_US/libritts_r-medium/en_US-libritts_r-medium.onnx";

/// Bundled voices as `(display name, model path)`.
pub const AVAILABLE_VOICES: &[(&str, &str)] = &[
    (
        "LibriTTS R (American, medium)",
        "voices/en_US/libritts_r-medium/en_US-libritts_r-medium.onnx",
    ),
    (
        "Joe (American, medium)",
        "voices/en_US/joe-medium/en_US-joe-medium.onnx",
    ),
    (
        "Cori (British, high quality)",
        "voices/en_GB/cori-high/en_GB-cori-high.onnx",
    ),
    (
        "Jenny Dioco (British, medium)",
        "voices/en_GB/jenny_dioco-medium/en_GB-jenny_dioco-medium.onnx",
    ),
];

/// The JSON sidecar shipped next to every Piper model (`<model>.onnx.json`).
///
/// Only the fields needed for synthesis are read; the rest are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    pub audio: AudioConfig,
    pub espeak: EspeakVoice,
    #[serde(default = "default_num_speakers")]
    pub num_speakers: u32,
    pub phoneme_id_map: HashMap<String, Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EspeakVoice {
    pub voice: String,
}

fn default_num_speakers() -> u32 {
    1
}

impl VoiceConfig {
    pub fn load(path: &Path) -> Result<Self, PiperError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PiperError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_json(json: &str) -> Result<Self, PiperError> {
        serde_json::from_str(json).map_err(|e| PiperError::Config(e.to_string()))
    }
}

/// Path of the JSON sidecar for `model_path` (`voice.onnx` → `voice.onnx.json`).
pub fn config_path_for(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}
