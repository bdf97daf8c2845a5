use std::path::Path;

use indicatif::ProgressBar;

use crate::assembler::Assembler;
use crate::audio::AudioBuffer;
use crate::config::AudiobookConfig;
use crate::error::AudiobookError;
use crate::export::{export, Metadata};
use crate::fragmenter::{Fragment, Fragmenter};
use crate::normalizer::TextNormalizer;
use crate::pause::PausePolicy;
use crate::SynthesisEngine;

/// End-to-end audiobook pipeline around a loaded synthesis engine.
///
/// Paragraphs are fragmented, synthesized one fragment at a time, joined with
/// pauses, normalized and faded once, then exported. The output file is only
/// created after the whole buffer has been finalized.
pub struct AudiobookGenerator<E: SynthesisEngine> {
    engine: E,
    params: Option<E::SynthesisParams>,
    config: AudiobookConfig,
    fragmenter: Fragmenter,
    pauses: PausePolicy,
    progress: ProgressBar,
}

impl<E> AudiobookGenerator<E>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    pub fn new(engine: E, config: AudiobookConfig) -> Self {
        let fragmenter = Fragmenter::new(TextNormalizer::new(config.normalizer.clone()));
        let pauses = PausePolicy::new(config.pauses);
        Self {
            engine,
            params: None,
            config,
            fragmenter,
            pauses,
            progress: ProgressBar::hidden(),
        }
    }

    /// Synthesis parameters passed to the engine for every fragment.
    pub fn with_params(mut self, params: E::SynthesisParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &AudiobookConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn fragments<S: AsRef<str>>(&self, paragraphs: &[S]) -> Vec<Fragment> {
        self.fragmenter.fragment(paragraphs)
    }

    /// Produce the finished (normalized and faded) audio for `paragraphs`.
    pub fn render<S: AsRef<str>>(&mut self, paragraphs: &[S]) -> Result<AudioBuffer, AudiobookError> {
        if paragraphs.is_empty() {
            return Err(AudiobookError::NoText);
        }

        let fragments = self.fragments(paragraphs);
        if fragments.is_empty() {
            return Err(AudiobookError::EmptyFragments);
        }
        log::info!(
            "Synthesizing {} fragments from {} paragraphs",
            fragments.len(),
            paragraphs.len()
        );

        let assembler = Assembler::new(self.pauses).with_progress(self.progress.clone());
        let engine = &mut self.engine;
        let params = &self.params;
        let raw = assembler.assemble(&fragments, |text| engine.synthesize(text, params.clone()))?;

        log::info!("Assembled {:.1}s of audio", raw.duration().as_secs_f64());
        Ok(raw.finish(&self.config.finish))
    }

    /// Render `paragraphs` and write the result to `output`.
    ///
    /// `metadata` is only embedded in MP3 output.
    pub fn generate<S: AsRef<str>>(
        &mut self,
        paragraphs: &[S],
        output: &Path,
        metadata: Option<&Metadata>,
    ) -> Result<(), AudiobookError> {
        let audio = self.render(paragraphs)?;
        export(&audio, output, metadata, &self.config.export)?;
        log::info!("Audiobook written to {}", output.display());
        Ok(())
    }
}
