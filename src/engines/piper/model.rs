use std::path::Path;

use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use super::phonemizer::{phonemize, EspeakConfig};
use super::vocab::PhonemeIdMap;
use super::voices::{config_path_for, VoiceConfig};

/// Peak floor used when scaling model output to 16-bit.
const MIN_PEAK: f32 = 0.01;

#[derive(thiserror::Error, Debug)]
pub enum PiperError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error(
        "espeak-ng not found. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download"
    )]
    EspeakNotFound,
    #[error("Phonemization failed: {0}")]
    PhonemizerFailed(String),
    #[error("Speaker {0} does not exist in this voice")]
    SpeakerNotFound(i64),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("Invalid voice config: {0}")]
    Config(String),
}

/// Voice shaping for one synthesis call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub length_scale: f32,
    pub noise_scale: f32,
    pub noise_w: f32,
}

/// Internal Piper ONNX model state.
pub struct PiperModel {
    session: Session,
    config: VoiceConfig,
    phoneme_ids: PhonemeIdMap,
    /// True if the model takes a speaker id input (multi-speaker voices).
    has_speaker_input: bool,
}

impl PiperModel {
    /// Load a Piper voice.
    ///
    /// `model_path` points at the `.onnx` file; its `.onnx.json` sidecar must
    /// sit next to it.
    pub fn load(model_path: &Path, num_threads: Option<usize>) -> Result<Self, PiperError> {
        let config_path = config_path_for(model_path);
        if !config_path.exists() {
            return Err(PiperError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "Voice config not found at {}. Piper voices ship a .onnx.json next to the model.",
                    config_path.display()
                ),
            )));
        }
        let config = VoiceConfig::load(&config_path)?;
        let phoneme_ids = PhonemeIdMap::from_config(&config.phoneme_id_map)?;

        log::info!("Loading Piper model from {}", model_path.display());
        let session = init_session(model_path, num_threads)?;
        let has_speaker_input = detect_speaker_input(&session);

        log::info!(
            "Voice '{}': {} Hz, {} speaker(s), {} phonemes",
            config.espeak.voice,
            config.audio.sample_rate,
            config.num_speakers,
            phoneme_ids.len()
        );

        Ok(Self {
            session,
            config,
            phoneme_ids,
            has_speaker_input,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.audio.sample_rate
    }

    /// Synthesize 16-bit audio for `text`.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        scales: Scales,
        speaker_id: Option<i64>,
        espeak: &EspeakConfig,
    ) -> Result<Vec<i16>, PiperError> {
        let phonemes = phonemize(text, &self.config.espeak.voice, espeak)?;
        if phonemes.is_empty() {
            log::warn!("No phonemes produced for text: {text:?}");
            return Ok(vec![]);
        }

        let ids = self.phoneme_ids.encode(&phonemes);
        let audio = self.infer(&ids, scales, speaker_id)?;
        Ok(float_to_int16(&audio))
    }

    /// Run ONNX inference on one phoneme id sequence.
    fn infer(
        &mut self,
        ids: &[i64],
        scales: Scales,
        speaker_id: Option<i64>,
    ) -> Result<Vec<f32>, PiperError> {
        let input = Array2::from_shape_vec((1, ids.len()), ids.to_vec())?;
        let lengths = ndarray::arr1(&[ids.len() as i64]);
        let scales = ndarray::arr1(&[scales.noise_scale, scales.length_scale, scales.noise_w]);

        let output = if self.has_speaker_input {
            let sid = speaker_id.unwrap_or(0);
            if sid < 0 || sid >= self.config.num_speakers as i64 {
                return Err(PiperError::SpeakerNotFound(sid));
            }
            let sid = ndarray::arr1(&[sid]);
            let inputs = inputs![
                "input" => TensorRef::from_array_view(input.view())?,
                "input_lengths" => TensorRef::from_array_view(lengths.view())?,
                "scales" => TensorRef::from_array_view(scales.view())?,
                "sid" => TensorRef::from_array_view(sid.view())?,
            ];
            self.session.run(inputs)?
        } else {
            if let Some(sid) = speaker_id.filter(|&sid| sid != 0) {
                return Err(PiperError::SpeakerNotFound(sid));
            }
            let inputs = inputs![
                "input" => TensorRef::from_array_view(input.view())?,
                "input_lengths" => TensorRef::from_array_view(lengths.view())?,
                "scales" => TensorRef::from_array_view(scales.view())?,
            ];
            self.session.run(inputs)?
        };

        // Output shape is [1, 1, (1,) samples]; flatten it.
        let first_output = output
            .iter()
            .next()
            .ok_or_else(|| PiperError::Ort(ort::Error::new("No output from model")))?;
        let waveform = first_output.1.try_extract_array::<f32>()?;

        Ok(waveform.iter().copied().collect())
    }
}

fn init_session(onnx_path: &Path, num_threads: Option<usize>) -> Result<Session, PiperError> {
    let providers = vec![CPUExecutionProvider::default().build()];

    let mut builder = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_execution_providers(providers)?;

    if let Some(threads) = num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(onnx_path)?)
}

/// Multi-speaker voices take a `sid` input.
fn detect_speaker_input(session: &Session) -> bool {
    for input in session.inputs() {
        if input.name() == "sid" {
            return true;
        }
    }
    false
}

/// Scale float audio so its peak reaches 16-bit full scale, then clip.
pub fn float_to_int16(audio: &[f32]) -> Vec<i16> {
    let peak = audio.iter().fold(0f32, |peak, s| peak.max(s.abs())).max(MIN_PEAK);
    let gain = i16::MAX as f32 / peak;
    audio
        .iter()
        .map(|&s| (s * gain).clamp(-(i16::MAX as f32), i16::MAX as f32) as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int16_conversion_scales_to_peak() {
        let pcm = float_to_int16(&[0.0, 0.25, -0.5]);
        assert_eq!(pcm, vec![0, 16383, -32767]);
    }

    #[test]
    fn quiet_audio_is_not_over_amplified() {
        let pcm = float_to_int16(&[0.001, -0.001]);
        assert_eq!(pcm, vec![3276, -3276]);
    }

    #[test]
    fn missing_sidecar_is_reported_before_loading_onnx() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("voice.onnx");
        std::fs::write(&model, b"not a model").unwrap();

        let err = PiperModel::load(&model, None).err().unwrap();
        assert!(matches!(err, PiperError::Io(_)));
    }
}
