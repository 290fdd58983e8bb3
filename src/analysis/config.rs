use serde::{Deserialize, Serialize};

use super::error::FingerprintError;
use crate::config::defaults::{
    default_contrast_bands, default_contrast_fmin_hz, default_decode_timeout_seconds,
    default_delta_width, default_denoise_patch_radius, default_denoise_search_radius,
    default_denoise_strength, default_fft_size, default_hop_length, default_max_duration_seconds,
    default_mel_bands, default_mfcc_count, default_rolloff_percent, default_sample_rate,
    default_tempo_window, default_true,
};

/// Number of pitch classes in a chroma frame.
pub const CHROMA_BINS: usize = 12;

/// Extraction parameters shared by ingestion and query time.
///
/// Changing any field changes the fingerprint layout tag, so stored fingerprints
/// built under another configuration stop being comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Target sample rate the loader resamples to.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Audio beyond this many seconds is dropped (never padded).
    #[serde(default = "default_max_duration_seconds")]
    pub max_duration_seconds: f32,
    /// STFT window length in samples.
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    /// Hop between successive frames in samples.
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    /// Number of mel bands for the log-power mel spectrogram.
    #[serde(default = "default_mel_bands")]
    pub mel_bands: usize,
    /// Number of cepstral coefficients kept per frame.
    #[serde(default = "default_mfcc_count")]
    pub mfcc_count: usize,
    /// Number of octave bands above `contrast_fmin_hz` for spectral contrast.
    #[serde(default = "default_contrast_bands")]
    pub contrast_bands: usize,
    /// Lower edge of the first contrast octave.
    #[serde(default = "default_contrast_fmin_hz")]
    pub contrast_fmin_hz: f32,
    /// Energy fraction used for spectral rolloff.
    #[serde(default = "default_rolloff_percent")]
    pub rolloff_percent: f32,
    /// Tempogram window length in frames (one output row per lag).
    #[serde(default = "default_tempo_window")]
    pub tempo_window: usize,
    /// Frames spanned by the delta regression (odd, >= 3).
    #[serde(default = "default_delta_width")]
    pub delta_width: usize,
    /// Decode deadline; `0` disables it.
    #[serde(default = "default_decode_timeout_seconds")]
    pub decode_timeout_seconds: f32,
    /// Denoising pass applied before extraction.
    #[serde(default)]
    pub denoise: DenoiseConfig,
}

/// Parameters of the similarity-weighted neighborhood filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Neighbors considered on each side of a sample.
    #[serde(default = "default_denoise_search_radius")]
    pub search_radius: usize,
    /// Half-width of the patch compared between two samples.
    #[serde(default = "default_denoise_patch_radius")]
    pub patch_radius: usize,
    /// Filter bandwidth relative to the estimated noise level.
    #[serde(default = "default_denoise_strength")]
    pub strength: f32,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            search_radius: default_denoise_search_radius(),
            patch_radius: default_denoise_patch_radius(),
            strength: default_denoise_strength(),
        }
    }
}

impl DenoiseConfig {
    /// Clamp radii to at least one sample and drop non-finite strengths.
    pub fn normalized(mut self) -> Self {
        self.search_radius = self.search_radius.max(1);
        self.patch_radius = self.patch_radius.max(1);
        if !self.strength.is_finite() || self.strength <= 0.0 {
            self.strength = default_denoise_strength();
        }
        self
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            max_duration_seconds: default_max_duration_seconds(),
            fft_size: default_fft_size(),
            hop_length: default_hop_length(),
            mel_bands: default_mel_bands(),
            mfcc_count: default_mfcc_count(),
            contrast_bands: default_contrast_bands(),
            contrast_fmin_hz: default_contrast_fmin_hz(),
            rolloff_percent: default_rolloff_percent(),
            tempo_window: default_tempo_window(),
            delta_width: default_delta_width(),
            decode_timeout_seconds: default_decode_timeout_seconds(),
            denoise: DenoiseConfig::default(),
        }
    }
}

impl FingerprintConfig {
    /// Reject parameter combinations the extractor cannot work with.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        let invalid = |reason: String| Err(FingerprintError::InvalidConfig(reason));
        if self.sample_rate == 0 {
            return invalid("sample_rate must be positive".to_string());
        }
        if !self.max_duration_seconds.is_finite() || self.max_duration_seconds <= 0.0 {
            return invalid(format!(
                "max_duration_seconds must be positive, got {}",
                self.max_duration_seconds
            ));
        }
        if self.fft_size < 16 {
            return invalid(format!("fft_size must be at least 16, got {}", self.fft_size));
        }
        if self.hop_length == 0 {
            return invalid("hop_length must be positive".to_string());
        }
        if self.mel_bands == 0 {
            return invalid("mel_bands must be positive".to_string());
        }
        if self.mfcc_count == 0 || self.mfcc_count > self.mel_bands {
            return invalid(format!(
                "mfcc_count must be within 1..={}, got {}",
                self.mel_bands, self.mfcc_count
            ));
        }
        if self.contrast_bands == 0 || !(self.contrast_fmin_hz > 0.0) {
            return invalid("spectral contrast needs at least one band above 0 Hz".to_string());
        }
        if !(self.rolloff_percent > 0.0 && self.rolloff_percent < 1.0) {
            return invalid(format!(
                "rolloff_percent must be within (0, 1), got {}",
                self.rolloff_percent
            ));
        }
        if self.tempo_window < 2 {
            return invalid(format!(
                "tempo_window must be at least 2, got {}",
                self.tempo_window
            ));
        }
        if self.delta_width < 3 || self.delta_width % 2 == 0 {
            return invalid(format!(
                "delta_width must be odd and at least 3, got {}",
                self.delta_width
            ));
        }
        if self.decode_timeout_seconds > 0.0
            && std::time::Duration::try_from_secs_f32(self.decode_timeout_seconds).is_err()
        {
            return invalid(format!(
                "decode_timeout_seconds is out of range, got {}",
                self.decode_timeout_seconds
            ));
        }
        Ok(())
    }

    /// Apply the clamps that never change the meaning of a valid configuration.
    pub fn normalized(mut self) -> Self {
        self.denoise = self.denoise.normalized();
        if !self.decode_timeout_seconds.is_finite() || self.decode_timeout_seconds < 0.0 {
            self.decode_timeout_seconds = 0.0;
        }
        self
    }

    /// Decode deadline, or `None` when disabled or too large to represent.
    pub fn decode_timeout(&self) -> Option<std::time::Duration> {
        if self.decode_timeout_seconds > 0.0 {
            std::time::Duration::try_from_secs_f32(self.decode_timeout_seconds).ok()
        } else {
            None
        }
    }

    /// Longest buffer the loader keeps, in samples.
    pub fn max_samples(&self) -> usize {
        (self.max_duration_seconds.max(0.0) as f64 * self.sample_rate as f64).floor() as usize
    }

    /// Rows in the spectral contrast matrix (octave bands plus the open top band).
    pub fn contrast_rows(&self) -> usize {
        self.contrast_bands + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shared_constants() {
        let cfg = FingerprintConfig::default();
        assert_eq!(cfg.sample_rate, 44_100);
        assert_eq!(cfg.fft_size, 4096);
        assert_eq!(cfg.hop_length, 256);
        assert_eq!(cfg.mel_bands, 256);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_even_delta_width() {
        let cfg = FingerprintConfig {
            delta_width: 4,
            ..FingerprintConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, FingerprintError::InvalidConfig(_)));
    }

    #[test]
    fn validate_rejects_more_cepstra_than_bands() {
        let cfg = FingerprintConfig {
            mel_bands: 8,
            mfcc_count: 13,
            ..FingerprintConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn max_samples_truncates_fractional_tail() {
        let cfg = FingerprintConfig {
            sample_rate: 10,
            max_duration_seconds: 1.25,
            ..FingerprintConfig::default()
        };
        assert_eq!(cfg.max_samples(), 12);
    }

    #[test]
    fn normalized_clamps_denoise_and_disables_negative_timeout() {
        let cfg = FingerprintConfig {
            decode_timeout_seconds: -1.0,
            denoise: DenoiseConfig {
                enabled: true,
                search_radius: 0,
                patch_radius: 0,
                strength: f32::NAN,
            },
            ..FingerprintConfig::default()
        }
        .normalized();
        assert_eq!(cfg.denoise.search_radius, 1);
        assert_eq!(cfg.denoise.patch_radius, 1);
        assert_eq!(cfg.denoise.strength, 1.0);
        assert!(cfg.decode_timeout().is_none());
    }

    #[test]
    fn oversized_decode_timeout_is_rejected_not_panicking() {
        let config = FingerprintConfig {
            decode_timeout_seconds: 1e30,
            ..FingerprintConfig::default()
        }
        .normalized();
        assert_eq!(config.decode_timeout(), None);
        assert!(matches!(
            config.validate(),
            Err(FingerprintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_toml_keys_fall_back_to_defaults() {
        let cfg: FingerprintConfig = toml::from_str("hop_length = 512").unwrap();
        assert_eq!(cfg.hop_length, 512);
        assert_eq!(cfg.fft_size, 4096);
        assert!(cfg.denoise.enabled);
    }
}
