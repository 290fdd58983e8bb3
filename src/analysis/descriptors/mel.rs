use ndarray::Array2;

use super::stft::bin_frequencies;

/// Floor applied to power values before taking logarithms.
pub(crate) const POWER_FLOOR: f32 = 1e-10;
/// Dynamic range kept below the loudest value, in dB.
pub(crate) const TOP_DB: f32 = 80.0;

/// Slaney-normalized triangular filters on the HTK mel scale, spanning 0 Hz to Nyquist.
pub(crate) struct MelBank {
    weights: Array2<f32>,
}

impl MelBank {
    pub(crate) fn new(sample_rate: u32, fft_size: usize, mel_bands: usize) -> Self {
        let fft_freqs = bin_frequencies(sample_rate, fft_size);
        let nyquist = sample_rate as f32 * 0.5;
        let mel_max = hz_to_mel(nyquist);
        let edges: Vec<f32> = (0..mel_bands + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (mel_bands + 1) as f32))
            .collect();

        let mut weights = Array2::<f32>::zeros((mel_bands, fft_freqs.len()));
        for band in 0..mel_bands {
            let (left, center, right) = (edges[band], edges[band + 1], edges[band + 2]);
            let enorm = 2.0 / (right - left).max(f32::EPSILON);
            for (bin, &freq) in fft_freqs.iter().enumerate() {
                let lower = (freq - left) / (center - left).max(f32::EPSILON);
                let upper = (right - freq) / (right - center).max(f32::EPSILON);
                let w = lower.min(upper).max(0.0);
                if w > 0.0 {
                    weights[[band, bin]] = w * enorm;
                }
            }
        }
        Self { weights }
    }

    pub(crate) fn bands(&self) -> usize {
        self.weights.nrows()
    }

    /// Project a power spectrogram (bins by frames) onto the mel bands.
    pub(crate) fn apply(&self, power: &Array2<f32>) -> Array2<f32> {
        self.weights.dot(power)
    }
}

/// Convert power to dB relative to `reference`, clipped to `TOP_DB` below the peak.
pub(crate) fn power_to_db(power: &Array2<f32>, reference: f32) -> Array2<f32> {
    let ref_db = 10.0 * reference.max(POWER_FLOOR).log10();
    let mut db = power.mapv(|p| 10.0 * p.max(POWER_FLOOR).log10() - ref_db);
    let peak = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if peak.is_finite() {
        let floor = peak - TOP_DB;
        db.mapv_inplace(|v| v.max(floor));
    }
    db
}

/// Log-power mel spectrogram referenced to its own maximum, so every value is at most 0 dB.
pub(crate) fn log_mel_spectrogram(mel_power: &Array2<f32>) -> Array2<f32> {
    let reference = mel_power.iter().copied().fold(0.0_f32, f32::max);
    power_to_db(mel_power, reference)
}

pub(crate) fn hz_to_mel(hz: f32) -> f32 {
    2595.0_f32 * (1.0 + hz / 700.0).log10()
}

pub(crate) fn mel_to_hz(mel: f32) -> f32 {
    700.0_f32 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mel_scale_round_trips_through_hz() {
        for hz in [0.0_f32, 440.0, 1_000.0, 8_000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 0.05);
        }
        assert!((hz_to_mel(1_000.0) - 1_000.0).abs() < 1.0);
    }

    #[test]
    fn bank_has_requested_shape_and_no_negative_weights() {
        let bank = MelBank::new(22_050, 1024, 40);
        assert_eq!(bank.bands(), 40);
        assert_eq!(bank.weights.ncols(), 513);
        assert!(bank.weights.iter().all(|&w| w >= 0.0));
        assert!(bank.weights.row(20).sum() > 0.0);
    }

    #[test]
    fn log_mel_is_referenced_to_peak_and_floored() {
        let power = array![[1.0_f32, 1e-3], [1e-12, 0.5]];
        let db = log_mel_spectrogram(&power);
        assert!((db[[0, 0]] - 0.0).abs() < 1e-6);
        assert!((db[[0, 1]] + 30.0).abs() < 1e-4);
        assert!((db[[1, 0]] + TOP_DB).abs() < 1e-4);
        assert!(db.iter().all(|&v| v <= 0.0));
    }
}
