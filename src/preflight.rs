//! Path checks run before any text is extracted or any audio synthesized.

use std::path::Path;

use crate::error::AudiobookError;
use crate::export::output_dir;

/// Fail fast on a missing input document or voice model, in that order.
pub fn check_inputs(input: &Path, model: &Path) -> Result<(), AudiobookError> {
    if !input.is_file() {
        return Err(AudiobookError::InputNotFound(input.to_path_buf()));
    }
    if !model.is_file() {
        return Err(AudiobookError::VoiceModelNotFound(model.to_path_buf()));
    }
    Ok(())
}

/// The output file itself may not exist yet, but its directory must.
pub fn check_output(output: &Path) -> Result<(), AudiobookError> {
    let dir = output_dir(output);
    if !dir.is_dir() {
        return Err(AudiobookError::OutputDirNotFound(dir.to_path_buf()));
    }
    Ok(())
}
