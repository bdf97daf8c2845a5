//! Piper text-to-speech engine implementation.
//!
//! This module provides a synthesis engine for Piper VITS voices exported to
//! ONNX. Text is phonemized with espeak-ng, encoded with the voice's phoneme
//! id map, and run through the model in a single ONNX Runtime call.
//!
//! # System Requirements
//!
//! **espeak-ng** must be installed on your system:
//! - **Linux**: `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! # Voice Layout
//!
//! ```text
//! voices/en_US/joe-medium/
//! ├── en_US-joe-medium.onnx        # VITS model
//! └── en_US-joe-medium.onnx.json   # sample rate, espeak voice, phoneme id map
//! ```
//!
//! Voices: <https://huggingface.co/rhasspy/piper-voices>
//!
//! # Model Inputs
//!
//! | Name | Shape | Type | Contents |
//! |---|---|---|---|
//! | `input` | `[1, N]` | i64 | `^ _ (phoneme _)* $` ids |
//! | `input_lengths` | `[1]` | i64 | `N` |
//! | `scales` | `[3]` | f32 | noise scale, length scale, noise width |
//! | `sid` | `[1]` | i64 | speaker (multi-speaker voices only) |
//!
//! # Example
//!
//! ```rust,no_run
//! use audiobook::{SynthesisEngine, engines::piper::{PiperEngine, PiperInferenceParams}};
//! use std::path::PathBuf;
//!
//! let mut engine = PiperEngine::new();
//! engine.load_model(&PathBuf::from("voices/en_GB/cori-high/en_GB-cori-high.onnx"))?;
//!
//! let params = PiperInferenceParams {
//!     length_scale: 1.1,
//!     ..Default::default()
//! };
//!
//! engine.synthesize_to_file("Good evening.", &PathBuf::from("out.wav"), Some(params))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod model;
pub mod phonemizer;
pub mod vocab;
pub mod voices;

pub use engine::{PiperEngine, PiperInferenceParams, PiperModelParams};
pub use model::PiperError;
pub use phonemizer::EspeakConfig;
pub use voices::{AVAILABLE_VOICES, DEFAULT_MODEL};
