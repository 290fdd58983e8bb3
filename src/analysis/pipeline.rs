use std::path::Path;

use tracing::{debug, info};

use super::audio::{AudioBuffer, load_audio};
use super::config::FingerprintConfig;
use super::descriptors::{ensure_full_frame, extract_descriptors};
use super::error::FingerprintError;
use super::fingerprint::{Fingerprint, build_fingerprint};

/// Peak level at or below which a buffer counts as digital silence.
const SILENCE_PEAK: f32 = 1e-6;

/// Decode, condition and fingerprint one file.
pub fn fingerprint_file(
    path: &Path,
    config: &FingerprintConfig,
) -> Result<Fingerprint, FingerprintError> {
    config.validate()?;
    let buffer = load_audio(path, config)?;
    let fingerprint = fingerprint_buffer(&buffer, config)?;
    info!(
        path = %path.display(),
        seconds = buffer.duration_seconds,
        dim = fingerprint.len(),
        "Fingerprinted"
    );
    Ok(fingerprint)
}

/// Fingerprint an already-decoded buffer.
///
/// Silent buffers carry no acoustic content and produce an all-zero fingerprint,
/// which the scorer treats as degenerate.
pub fn fingerprint_buffer(
    buffer: &AudioBuffer,
    config: &FingerprintConfig,
) -> Result<Fingerprint, FingerprintError> {
    config.validate()?;
    ensure_full_frame(buffer, config)?;
    let peak = buffer
        .samples
        .iter()
        .filter(|s| s.is_finite())
        .fold(0.0_f32, |m, &s| m.max(s.abs()));
    if peak <= SILENCE_PEAK {
        debug!(samples = buffer.len(), "Silent buffer; emitting zero fingerprint");
        return Ok(Fingerprint::silent(config));
    }
    let descriptors = extract_descriptors(buffer, config)?;
    Ok(build_fingerprint(&descriptors, config))
}

/// Fingerprint mono samples recorded at `sample_rate`.
pub fn fingerprint_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &FingerprintConfig,
) -> Result<Fingerprint, FingerprintError> {
    let buffer = AudioBuffer::from_interleaved(samples, 1, sample_rate, config);
    fingerprint_buffer(&buffer, config)
}
