use std::time::Duration;

use crate::config::PauseConfig;
use crate::fragmenter::Fragment;

/// Maps a fragment's boundary flags to the silence appended after its audio.
///
/// | Boundary | Segments |
/// |---|---|
/// | inside a sentence | comma |
/// | end of sentence | sentence |
/// | end of paragraph | sentence, then paragraph |
///
/// Paragraph pauses are additive: the sentence pause is never skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PausePolicy {
    config: PauseConfig,
}

impl PausePolicy {
    pub fn new(config: PauseConfig) -> Self {
        Self { config }
    }

    /// Silence segments to append after `fragment`, in order.
    pub fn pause_after(&self, fragment: &Fragment) -> Vec<Duration> {
        if !fragment.end_sentence {
            return vec![Duration::from_millis(self.config.comma_ms)];
        }
        let mut segments = vec![Duration::from_millis(self.config.sentence_ms)];
        if fragment.end_paragraph {
            segments.push(Duration::from_millis(self.config.paragraph_ms));
        }
        segments
    }

    /// Total silence after `fragment`.
    pub fn total_after(&self, fragment: &Fragment) -> Duration {
        self.pause_after(fragment).into_iter().sum()
    }
}
