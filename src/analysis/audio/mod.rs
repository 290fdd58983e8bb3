//! Signal loading: decode, downmix, resample and truncate to the configured window.

mod deadline;
mod decode;
mod downmix;
mod resample;

use std::path::Path;

use tracing::debug;

use super::config::FingerprintConfig;
use super::error::FingerprintError;
use deadline::{Deadline, run_with_deadline};

pub(crate) use downmix::downmix_to_mono;
pub(crate) use resample::resample_linear;

/// Extra source audio decoded past the window so resampling has a right-hand neighbor.
const DECODE_SLACK_SECONDS: f32 = 0.05;

/// Mono samples at the analysis rate, truncated (never padded) to the analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub duration_seconds: f32,
}

impl AudioBuffer {
    /// Build a buffer from interleaved samples at any rate.
    pub fn from_interleaved(
        samples: &[f32],
        channels: u16,
        source_rate: u32,
        config: &FingerprintConfig,
    ) -> Self {
        let mono = downmix_to_mono(samples, channels);
        let mut resampled = resample_linear(&mono, source_rate, config.sample_rate);
        resampled.truncate(config.max_samples());
        let duration_seconds = resampled.len() as f32 / config.sample_rate.max(1) as f32;
        Self {
            samples: resampled,
            sample_rate: config.sample_rate,
            duration_seconds,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Decode `path` into an [`AudioBuffer`], honoring the configured decode deadline.
pub fn load_audio(path: &Path, config: &FingerprintConfig) -> Result<AudioBuffer, FingerprintError> {
    let timeout = config.decode_timeout();
    let max_seconds = config.max_duration_seconds + DECODE_SLACK_SECONDS;
    let owned_path = path.to_path_buf();
    let decoded = match run_with_deadline(timeout, move || {
        decode::decode_audio(&owned_path, Some(max_seconds))
    }) {
        Deadline::Finished(result) => result?,
        Deadline::TimedOut(timeout) => {
            return Err(FingerprintError::DecodeTimeout {
                path: path.to_path_buf(),
                timeout,
            });
        }
        Deadline::Failed(reason) => return Err(FingerprintError::decode(path, reason)),
    };
    debug!(
        path = %path.display(),
        sample_rate = decoded.sample_rate,
        channels = decoded.channels,
        samples = decoded.samples.len(),
        "Decoded audio"
    );
    Ok(AudioBuffer::from_interleaved(
        &decoded.samples,
        decoded.channels,
        decoded.sample_rate,
        config,
    ))
}
