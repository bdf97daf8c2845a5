//! The audio accumulator and its one-shot finishing pass.

use std::time::Duration;

use crate::config::FinishConfig;

/// Full scale of a 16-bit sample (`2^15`).
const FULL_SCALE: f32 = 32768.0;

/// Mono 16-bit PCM audio at a fixed sample rate.
///
/// During assembly the buffer only grows. Finishing methods consume it and
/// return the processed audio, so nothing can append after finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn append_samples(&mut self, samples: &[i16]) {
        self.samples.extend_from_slice(samples);
    }

    /// Append `duration` of digital silence.
    pub fn append_silence(&mut self, duration: Duration) {
        let count = self.samples_for(duration);
        self.samples.resize(self.samples.len() + count, 0);
    }

    /// Number of samples covering `duration` at this buffer's rate.
    pub fn samples_for(&self, duration: Duration) -> usize {
        (self.sample_rate as u128 * duration.as_nanos() / 1_000_000_000) as usize
    }

    /// Scale the whole buffer so its peak sits `headroom_db` below full scale.
    ///
    /// A silent buffer is returned untouched.
    pub fn normalize(mut self, headroom_db: f32) -> Self {
        let peak = self
            .samples
            .iter()
            .map(|&s| (s as i32).unsigned_abs())
            .max()
            .unwrap_or(0);
        if peak == 0 {
            return self;
        }

        let gain = FULL_SCALE / peak as f32 * db_to_ratio(-headroom_db);
        log::debug!("Normalizing: peak {peak}, gain {gain:.3}");
        for sample in self.samples.iter_mut() {
            *sample = scale(*sample, gain);
        }
        self
    }

    /// Linear ramp from silence to full level over the first `duration`.
    pub fn fade_in(mut self, duration: Duration) -> Self {
        let n = self.samples_for(duration).min(self.samples.len());
        for (i, sample) in self.samples[..n].iter_mut().enumerate() {
            *sample = scale(*sample, i as f32 / n as f32);
        }
        self
    }

    /// Linear ramp from full level to silence over the last `duration`.
    pub fn fade_out(mut self, duration: Duration) -> Self {
        let n = self.samples_for(duration).min(self.samples.len());
        let start = self.samples.len() - n;
        for (i, sample) in self.samples[start..].iter_mut().enumerate() {
            *sample = scale(*sample, (n - 1 - i) as f32 / n as f32);
        }
        self
    }

    /// Normalize, then fade in and out, as configured.
    pub fn finish(self, config: &FinishConfig) -> Self {
        self.normalize(config.headroom_db)
            .fade_in(Duration::from_millis(config.fade_in_ms))
            .fade_out(Duration::from_millis(config.fade_out_ms))
    }
}

fn db_to_ratio(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

fn scale(sample: i16, gain: f32) -> i16 {
    (sample as f32 * gain)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
