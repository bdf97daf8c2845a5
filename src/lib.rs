//! # audiobook-rs
//!
//! Turns a written document into a single narrated audio file.
//!
//! ## Features
//!
//! - **Fragmentation**: text is normalized, split into sentences, then into
//!   comma-delimited fragments small enough for a TTS engine
//! - **Natural pauses**: silence of different lengths after commas, sentences,
//!   and paragraphs
//! - **Piper TTS**: ONNX voice models with espeak-ng phonemization
//! - **Documents**: PDF, EPUB, and plain text input; WAV and MP3 output
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! audiobook-rs = { version = "0.1", features = ["piper"] }
//! ```
//!
//! ```ignore
//! use std::path::Path;
//! use audiobook::{
//!     engines::piper::PiperEngine, load_paragraphs, AudiobookConfig, AudiobookGenerator,
//!     SynthesisEngine,
//! };
//!
//! let mut engine = PiperEngine::new();
//! engine.load_model(Path::new("voices/en_US/joe-medium/en_US-joe-medium.onnx"))?;
//!
//! let paragraphs = load_paragraphs(Path::new("book.epub"))?;
//! let mut generator = AudiobookGenerator::new(engine, AudiobookConfig::default());
//! generator.generate(&paragraphs, Path::new("book.mp3"), None)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod audio;
pub mod config;
pub mod document;
pub mod engines;
pub mod error;
pub mod export;
pub mod fragmenter;
pub mod generator;
pub mod normalizer;
pub mod numbers;
pub mod pause;
pub mod preflight;

use std::path::Path;

pub use assembler::Assembler;
pub use audio::AudioBuffer;
pub use config::{
    AudiobookConfig, AudiobookConfigBuilder, ExportConfig, FinishConfig, NormalizerConfig,
    PauseConfig,
};
pub use document::{load_paragraphs, split_paragraphs};
pub use error::AudiobookError;
pub use export::{export, Metadata, OutputFormat};
pub use fragmenter::{Fragment, Fragmenter};
pub use generator::AudiobookGenerator;
pub use normalizer::TextNormalizer;
pub use pause::PausePolicy;
pub use preflight::{check_inputs, check_output};

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains mono 16-bit PCM samples and the sample rate of the voice model
/// that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Raw audio samples as signed 16-bit values
    pub samples: Vec<i16>,
    /// Sample rate of the audio (fixed by the voice model)
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 16-bit PCM WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Common interface for text-to-speech synthesis engines.
///
/// This trait defines the standard operations that all synthesis engines must support.
/// Each engine may have different parameter types for model loading and inference configuration.
pub trait SynthesisEngine {
    /// Parameters for configuring inference behavior (speaking rate, noise, etc.)
    type SynthesisParams;
    /// Parameters for configuring model loading (threads, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given text.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        wav_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text, params)?.write_wav(wav_path)
    }
}
