use std::path::{Path, PathBuf};

use crate::{SynthesisEngine, SynthesisResult};

use super::model::{PiperError, PiperModel, Scales};
use super::phonemizer::EspeakConfig;

/// Parameters for configuring Piper model loading.
#[derive(Debug, Clone, Default)]
pub struct PiperModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the ORT default (typically all available cores).
    pub num_threads: Option<usize>,
}

/// Parameters for configuring a Piper synthesis request.
///
/// The defaults are the narration settings: natural speaking rate, slightly
/// reduced noise, and no engine-inserted silence (pauses are added by the
/// audiobook pipeline instead).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiperInferenceParams {
    /// Phoneme duration multiplier. Larger is slower.
    pub length_scale: f32,
    /// Generator noise.
    pub noise_scale: f32,
    /// Phoneme width noise.
    pub noise_w: f32,
    /// Seconds of silence appended after the synthesized text.
    pub sentence_silence: f32,
    /// Speaker for multi-speaker voices. `None` = speaker 0.
    pub speaker_id: Option<i64>,
}

impl Default for PiperInferenceParams {
    fn default() -> Self {
        Self {
            length_scale: 1.0,
            noise_scale: 0.6,
            noise_w: 0.8,
            sentence_silence: 0.0,
            speaker_id: None,
        }
    }
}

/// Piper text-to-speech engine.
///
/// Uses Piper VITS ONNX voices. Requires espeak-ng for phonemization.
/// Synthesis happens entirely in memory; no intermediate files are written.
///
/// # Quick Start
///
/// ```rust,no_run
/// use audiobook::{SynthesisEngine, engines::piper::PiperEngine};
/// use std::path::PathBuf;
///
/// // Uses system espeak-ng from PATH
/// let mut engine = PiperEngine::new();
/// engine.load_model(&PathBuf::from("voices/en_US/joe-medium/en_US-joe-medium.onnx"))?;
/// let result = engine.synthesize("Hello, world!", None)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Bundled espeak-ng
///
/// ```rust,no_run
/// use audiobook::engines::piper::PiperEngine;
/// use std::path::PathBuf;
///
/// let engine = PiperEngine::with_espeak(
///     Some(PathBuf::from("/app/resources/espeak-ng/espeak-ng")),
///     Some(PathBuf::from("/app/resources/espeak-ng-data")),
/// );
/// ```
pub struct PiperEngine {
    model: Option<PiperModel>,
    model_path: Option<PathBuf>,
    espeak: EspeakConfig,
}

impl Default for PiperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PiperEngine {
    /// Create a new engine that uses `espeak-ng` from PATH.
    pub fn new() -> Self {
        Self {
            model: None,
            model_path: None,
            espeak: EspeakConfig::default(),
        }
    }

    /// Create a new engine with explicit espeak-ng binary and data paths.
    ///
    /// Either path can be `None` to fall back to the system default.
    pub fn with_espeak(bin_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Self {
        Self {
            model: None,
            model_path: None,
            espeak: EspeakConfig {
                bin_path,
                data_path,
            },
        }
    }

    /// Native sample rate of the loaded voice.
    pub fn sample_rate(&self) -> Option<u32> {
        self.model.as_ref().map(|m| m.sample_rate())
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }
}

impl Drop for PiperEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for PiperEngine {
    type SynthesisParams = PiperInferenceParams;
    type ModelParams = PiperModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let model = PiperModel::load(model_path, params.num_threads)?;
        self.model = Some(model);
        self.model_path = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let model = self.model.as_mut().ok_or(PiperError::ModelNotLoaded)?;

        let p = params.unwrap_or_default();
        let scales = Scales {
            length_scale: p.length_scale,
            noise_scale: p.noise_scale,
            noise_w: p.noise_w,
        };
        let mut samples = model.synthesize_text(text, scales, p.speaker_id, &self.espeak)?;

        let sample_rate = model.sample_rate();
        if p.sentence_silence > 0.0 {
            let silence = (p.sentence_silence * sample_rate as f32) as usize;
            samples.resize(samples.len() + silence, 0);
        }

        Ok(SynthesisResult {
            samples,
            sample_rate,
        })
    }
}
