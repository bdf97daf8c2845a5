use std::path::PathBuf;

/// Errors produced while turning a document into an audiobook.
#[derive(thiserror::Error, Debug)]
pub enum AudiobookError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Voice model not found: {}", .0.display())]
    VoiceModelNotFound(PathBuf),
    #[error("Output directory not found: {}", .0.display())]
    OutputDirNotFound(PathBuf),
    #[error("Failed to extract text from {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },
    #[error("Unsupported document type '.{0}' (enable the `{0}` feature)")]
    UnsupportedDocument(String),
    #[error("No text extracted from input.")]
    NoText,
    #[error("No text fragments found to synthesize.")]
    EmptyFragments,
    #[error("Synthesis failed for fragment {index} ({text:?}): {message}")]
    Synthesis {
        index: usize,
        text: String,
        message: String,
    },
    #[error("Fragment {index} has sample rate {found} Hz, expected {expected} Hz")]
    SampleRateMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },
    #[error("Encoder '{0}' not found. Install LAME (`lame`) to write MP3 files")]
    EncoderNotFound(String),
    #[error("Encoding failed: {0}")]
    Encoder(String),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AudiobookError {
    fn from(err: serde_json::Error) -> Self {
        AudiobookError::Config(err.to_string())
    }
}

impl From<tempfile::PersistError> for AudiobookError {
    fn from(err: tempfile::PersistError) -> Self {
        AudiobookError::Io(err.error)
    }
}
