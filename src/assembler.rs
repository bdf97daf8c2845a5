use indicatif::ProgressBar;

use crate::audio::AudioBuffer;
use crate::error::AudiobookError;
use crate::fragmenter::Fragment;
use crate::pause::PausePolicy;
use crate::SynthesisResult;

/// Drives fragments through synthesis and the pause policy into one buffer.
///
/// Fragments are processed strictly in order, one at a time. The first
/// synthesized fragment fixes the sample rate; every later fragment must
/// match it. Progress is reported on an [`indicatif::ProgressBar`], hidden
/// unless one is supplied with [`Assembler::with_progress`].
pub struct Assembler {
    pauses: PausePolicy,
    progress: ProgressBar,
}

impl Assembler {
    pub fn new(pauses: PausePolicy) -> Self {
        Self {
            pauses,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    /// Synthesize every fragment and join the clips with boundary pauses.
    ///
    /// Any synthesis failure aborts the whole run: a partial audiobook is
    /// never returned.
    pub fn assemble<F>(
        &self,
        fragments: &[Fragment],
        mut synthesize: F,
    ) -> Result<AudioBuffer, AudiobookError>
    where
        F: FnMut(&str) -> Result<SynthesisResult, Box<dyn std::error::Error>>,
    {
        if fragments.is_empty() {
            return Err(AudiobookError::EmptyFragments);
        }

        self.progress.set_length(fragments.len() as u64);
        self.progress.set_position(0);

        let mut buffer: Option<AudioBuffer> = None;
        for (index, fragment) in fragments.iter().enumerate() {
            log::debug!("Synthesizing fragment {}/{}: {:?}", index + 1, fragments.len(), fragment.text);

            let clip = synthesize(&fragment.text).map_err(|e| AudiobookError::Synthesis {
                index,
                text: fragment.text.clone(),
                message: e.to_string(),
            })?;

            let buffer = buffer.get_or_insert_with(|| AudioBuffer::new(clip.sample_rate));
            if clip.sample_rate != buffer.sample_rate() {
                return Err(AudiobookError::SampleRateMismatch {
                    index,
                    expected: buffer.sample_rate(),
                    found: clip.sample_rate,
                });
            }

            buffer.append_samples(&clip.samples);
            for pause in self.pauses.pause_after(fragment) {
                buffer.append_silence(pause);
            }

            self.progress.inc(1);
        }
        self.progress.finish();

        // Non-empty input always initializes the buffer.
        buffer.ok_or(AudiobookError::EmptyFragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PauseConfig;

    fn frag(text: &str, end_sentence: bool, end_paragraph: bool) -> Fragment {
        Fragment {
            text: text.to_string(),
            end_sentence,
            end_paragraph,
        }
    }

    /// One sample per character, valued by the character's position in the alphabet.
    fn spell(text: &str) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        Ok(SynthesisResult {
            samples: text.bytes().map(|b| (b - b'a' + 1) as i16).collect(),
            sample_rate: 1000,
        })
    }

    #[test]
    fn empty_fragment_list_is_fatal() {
        let assembler = Assembler::new(PausePolicy::default());
        let err = assembler.assemble(&[], spell).unwrap_err();
        assert!(matches!(err, AudiobookError::EmptyFragments));
    }

    #[test]
    fn clips_and_pauses_are_appended_in_order() {
        let policy = PausePolicy::new(PauseConfig {
            comma_ms: 2,
            sentence_ms: 3,
            paragraph_ms: 4,
        });
        let fragments = [frag("ab", false, false), frag("c", true, false), frag("d", true, true)];

        let buffer = Assembler::new(policy).assemble(&fragments, spell).unwrap();

        assert_eq!(buffer.sample_rate(), 1000);
        assert_eq!(
            buffer.samples(),
            &[1, 2, 0, 0, 3, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn paragraph_end_gets_sentence_plus_paragraph_silence() {
        let fragments = [frag("a", true, true)];
        let buffer = Assembler::new(PausePolicy::default()).assemble(&fragments, spell).unwrap();
        assert_eq!(buffer.len(), 1 + 1500);
    }

    #[test]
    fn synthesis_failure_aborts_run() {
        let fragments = [frag("a", false, false), frag("b", true, true)];
        let mut calls = 0;
        let err = Assembler::new(PausePolicy::default())
            .assemble(&fragments, |text| {
                calls += 1;
                if text == "b" {
                    return Err("engine exploded".into());
                }
                spell(text)
            })
            .unwrap_err();

        assert_eq!(calls, 2);
        match err {
            AudiobookError::Synthesis { index, text, message } => {
                assert_eq!(index, 1);
                assert_eq!(text, "b");
                assert_eq!(message, "engine exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sample_rate_change_is_rejected() {
        let fragments = [frag("a", false, false), frag("b", true, true)];
        let err = Assembler::new(PausePolicy::default())
            .assemble(&fragments, |text| {
                let mut clip = spell(text)?;
                if text == "b" {
                    clip.sample_rate = 2000;
                }
                Ok(clip)
            })
            .unwrap_err();

        assert!(matches!(
            err,
            AudiobookError::SampleRateMismatch {
                index: 1,
                expected: 1000,
                found: 2000
            }
        ));
    }

    #[test]
    fn progress_counts_every_fragment() {
        let fragments = [frag("a", false, false), frag("b", false, false), frag("c", true, true)];
        let assembler = Assembler::new(PausePolicy::default());
        assembler.assemble(&fragments, spell).unwrap();

        assert_eq!(assembler.progress().length(), Some(3));
        assert_eq!(assembler.progress().position(), 3);
    }
}
