//! Per-frame descriptor matrices (coefficient rows by time frames).

mod cepstral;
mod chroma;
mod contrast;
mod mel;
mod spectral;
pub(crate) mod stft;
mod tempo;
mod temporal;

use ndarray::Array2;
use tracing::debug;

use super::audio::AudioBuffer;
use super::config::{CHROMA_BINS, FingerprintConfig};
use super::error::FingerprintError;
use super::preprocess;

/// Descriptor families in canonical fingerprint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorFamily {
    Mfcc,
    MfccDelta,
    MfccDelta2,
    Chroma,
    SpectralContrast,
    LogMel,
    ZeroCrossingRate,
    Rolloff,
    Bandwidth,
    Tempogram,
}

impl DescriptorFamily {
    pub const ALL: [DescriptorFamily; 10] = [
        DescriptorFamily::Mfcc,
        DescriptorFamily::MfccDelta,
        DescriptorFamily::MfccDelta2,
        DescriptorFamily::Chroma,
        DescriptorFamily::SpectralContrast,
        DescriptorFamily::LogMel,
        DescriptorFamily::ZeroCrossingRate,
        DescriptorFamily::Rolloff,
        DescriptorFamily::Bandwidth,
        DescriptorFamily::Tempogram,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DescriptorFamily::Mfcc => "mfcc",
            DescriptorFamily::MfccDelta => "mfcc_delta",
            DescriptorFamily::MfccDelta2 => "mfcc_delta2",
            DescriptorFamily::Chroma => "chroma",
            DescriptorFamily::SpectralContrast => "spectral_contrast",
            DescriptorFamily::LogMel => "log_mel",
            DescriptorFamily::ZeroCrossingRate => "zero_crossing_rate",
            DescriptorFamily::Rolloff => "spectral_rolloff",
            DescriptorFamily::Bandwidth => "spectral_bandwidth",
            DescriptorFamily::Tempogram => "tempogram",
        }
    }

    /// Row count of this family's matrix under `config`.
    pub fn rows(self, config: &FingerprintConfig) -> usize {
        match self {
            DescriptorFamily::Mfcc | DescriptorFamily::MfccDelta | DescriptorFamily::MfccDelta2 => {
                config.mfcc_count
            }
            DescriptorFamily::Chroma => CHROMA_BINS,
            DescriptorFamily::SpectralContrast => config.contrast_rows(),
            DescriptorFamily::LogMel => config.mel_bands,
            DescriptorFamily::ZeroCrossingRate
            | DescriptorFamily::Rolloff
            | DescriptorFamily::Bandwidth => 1,
            DescriptorFamily::Tempogram => config.tempo_window,
        }
    }
}

/// One family's values, coefficients by frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorMatrix {
    pub family: DescriptorFamily,
    pub values: Array2<f32>,
}

/// Every family's matrix for one buffer, in canonical order, sharing one frame count.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorSet {
    frames: usize,
    matrices: Vec<DescriptorMatrix>,
}

impl DescriptorSet {
    pub(crate) fn new(frames: usize, matrices: Vec<DescriptorMatrix>) -> Self {
        Self { frames, matrices }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn matrices(&self) -> &[DescriptorMatrix] {
        &self.matrices
    }

    pub fn get(&self, family: DescriptorFamily) -> Option<&DescriptorMatrix> {
        self.matrices.iter().find(|m| m.family == family)
    }
}

/// Reject buffers that cannot fill a single analysis frame.
pub(crate) fn ensure_full_frame(
    buffer: &AudioBuffer,
    config: &FingerprintConfig,
) -> Result<(), FingerprintError> {
    if buffer.len() < config.fft_size {
        return Err(FingerprintError::InsufficientSignal {
            samples: buffer.len(),
            frame_size: config.fft_size,
        });
    }
    Ok(())
}

/// Condition the buffer and compute every descriptor family.
pub fn extract_descriptors(
    buffer: &AudioBuffer,
    config: &FingerprintConfig,
) -> Result<DescriptorSet, FingerprintError> {
    config.validate()?;
    ensure_full_frame(buffer, config)?;
    let samples = preprocess::condition(&buffer.samples, &config.denoise);
    let sample_rate = buffer.sample_rate;

    let spectrogram =
        stft::stft_magnitude(&samples, sample_rate, config.fft_size, config.hop_length);
    let frames = spectrogram.frames();
    let bin_freqs = spectrogram.bin_frequencies();
    let power = spectrogram.power();

    let mel_bank = mel::MelBank::new(sample_rate, config.fft_size, config.mel_bands);
    let mel_power = mel_bank.apply(&power);
    let log_mel = mel::log_mel_spectrogram(&mel_power);

    let mfcc = cepstral::mfcc(&mel_power, config.mfcc_count);
    let mfcc_delta = cepstral::delta(&mfcc, config.delta_width);
    let mfcc_delta2 = cepstral::delta(&mfcc_delta, config.delta_width);
    let chroma = chroma::chroma(&power, &bin_freqs);
    let contrast = contrast::spectral_contrast(
        &spectrogram.magnitude,
        &bin_freqs,
        config.contrast_fmin_hz,
        config.contrast_bands,
    );
    let zcr = temporal::zero_crossing_rate(&samples, config.fft_size, config.hop_length, frames);
    let rolloff = spectral::rolloff(&spectrogram.magnitude, &bin_freqs, config.rolloff_percent);
    let bandwidth = spectral::bandwidth(&spectrogram.magnitude, &bin_freqs);
    let onsets = tempo::onset_envelope(&log_mel);
    let tempogram = tempo::tempogram(&onsets, config.tempo_window);

    let values = [
        mfcc, mfcc_delta, mfcc_delta2, chroma, contrast, log_mel, zcr, rolloff, bandwidth,
        tempogram,
    ];
    let matrices: Vec<DescriptorMatrix> = DescriptorFamily::ALL
        .into_iter()
        .zip(values)
        .map(|(family, values)| DescriptorMatrix { family, values })
        .collect();
    debug_assert!(
        matrices
            .iter()
            .all(|m| m.values.ncols() == frames && m.values.nrows() == m.family.rows(config))
    );
    debug!(
        samples = samples.len(),
        frames,
        mel_bands = mel_bank.bands(),
        "Extracted descriptors"
    );
    Ok(DescriptorSet::new(frames, matrices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FingerprintConfig {
        FingerprintConfig {
            sample_rate: 8_000,
            max_duration_seconds: 2.0,
            fft_size: 512,
            hop_length: 128,
            mel_bands: 32,
            mfcc_count: 13,
            contrast_bands: 4,
            tempo_window: 32,
            ..FingerprintConfig::default()
        }
    }

    fn tone_buffer(len: usize, config: &FingerprintConfig) -> AudioBuffer {
        let samples: Vec<f32> = (0..len)
            .map(|i| {
                let t = i as f32 / config.sample_rate as f32;
                0.4 * (2.0 * std::f32::consts::PI * 330.0 * t).sin()
                    + 0.1 * (2.0 * std::f32::consts::PI * 1_250.0 * t).sin()
            })
            .collect();
        AudioBuffer::from_interleaved(&samples, 1, config.sample_rate, config)
    }

    #[test]
    fn every_family_shares_the_frame_count() {
        let config = test_config();
        let buffer = tone_buffer(8_000, &config);
        let set = extract_descriptors(&buffer, &config).unwrap();
        assert_eq!(set.frames(), 1 + 8_000 / 128);
        assert_eq!(set.matrices().len(), DescriptorFamily::ALL.len());
        for (matrix, family) in set.matrices().iter().zip(DescriptorFamily::ALL) {
            assert_eq!(matrix.family, family);
            assert_eq!(matrix.values.ncols(), set.frames());
            assert_eq!(matrix.values.nrows(), family.rows(&config));
            assert!(matrix.values.iter().all(|v| v.is_finite()), "{}", family.name());
        }
    }

    #[test]
    fn log_mel_never_exceeds_zero_db() {
        let config = test_config();
        let set = extract_descriptors(&tone_buffer(4_000, &config), &config).unwrap();
        let log_mel = set.get(DescriptorFamily::LogMel).unwrap();
        assert!(log_mel.values.iter().all(|&v| v <= 0.0));
    }

    #[test]
    fn buffer_shorter_than_one_frame_is_insufficient() {
        let config = test_config();
        let err = extract_descriptors(&tone_buffer(511, &config), &config).unwrap_err();
        assert!(matches!(
            err,
            FingerprintError::InsufficientSignal {
                samples: 511,
                frame_size: 512
            }
        ));
    }

    #[test]
    fn empty_buffer_is_insufficient() {
        let config = test_config();
        let empty = AudioBuffer::from_interleaved(&[], 1, 8_000, &config);
        assert!(matches!(
            extract_descriptors(&empty, &config),
            Err(FingerprintError::InsufficientSignal { samples: 0, .. })
        ));
    }
}
