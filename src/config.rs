//! Pipeline configuration.
//!
//! Every tunable of the pipeline lives in an explicit [`AudiobookConfig`] value
//! that is handed to the normalizer, pause policy, and exporter when they are
//! built. Nothing is read from process-wide state, so several pipelines with
//! different settings can run side by side.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::AudiobookError;

/// Silence durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// Pause after a comma-internal fragment.
    pub comma_ms: u64,
    /// Pause after the last fragment of a sentence.
    pub sentence_ms: u64,
    /// Extra pause after the last fragment of a paragraph (added after the sentence pause).
    pub paragraph_ms: u64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            comma_ms: 200,
            sentence_ms: 500,
            paragraph_ms: 1000,
        }
    }
}

/// Text normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Literal, case-sensitive replacements applied in order.
    pub abbreviations: Vec<(String, String)>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        let abbreviations = [("Dr.", "Doctor"), ("Mr.", "Mister"), ("etc.", "etcetera")]
            .iter()
            .map(|(abbr, full)| (abbr.to_string(), full.to_string()))
            .collect();
        Self { abbreviations }
    }
}

/// Post-processing applied once to the assembled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishConfig {
    /// Distance of the normalized peak below full scale, in dB.
    pub headroom_db: f32,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
}

impl Default for FinishConfig {
    fn default() -> Self {
        Self {
            headroom_db: 0.1,
            fade_in_ms: 200,
            fade_out_ms: 200,
        }
    }
}

/// Container encoding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Path to the `lame` binary. `None` looks it up on PATH.
    pub lame_path: Option<PathBuf>,
    /// Constant MP3 bitrate in kbps.
    pub mp3_bitrate_kbps: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            lame_path: None,
            mp3_bitrate_kbps: 128,
        }
    }
}

/// Complete configuration of an audiobook pipeline.
///
/// ```rust
/// use audiobook::{AudiobookConfigBuilder, PauseConfig};
///
/// let config = AudiobookConfigBuilder::default()
///     .pauses(PauseConfig { comma_ms: 150, ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.pauses.sentence_ms, 500);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct AudiobookConfig {
    pub pauses: PauseConfig,
    pub normalizer: NormalizerConfig,
    pub finish: FinishConfig,
    pub export: ExportConfig,
}

impl AudiobookConfig {
    /// Load a configuration from a JSON file. Omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, AudiobookError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
