use ndarray::Array2;

use super::mel::POWER_FLOOR;

/// Fraction of a band's bins averaged for its peak and its valley.
const QUANTILE: f32 = 0.02;

/// Peak-to-valley energy ratio in dB for octave bands starting at `fmin_hz`.
///
/// Band 0 spans `0..fmin_hz`, band `k` spans one octave, and the last of the
/// `bands + 1` rows is open up to Nyquist.
pub(crate) fn spectral_contrast(
    magnitude: &Array2<f32>,
    bin_freqs: &[f32],
    fmin_hz: f32,
    bands: usize,
) -> Array2<f32> {
    let frames = magnitude.ncols();
    let mut edges = Vec::with_capacity(bands + 2);
    edges.push(0.0_f32);
    for k in 0..=bands {
        edges.push(fmin_hz * 2.0_f32.powi(k as i32));
    }

    let mut out = Array2::<f32>::zeros((bands + 1, frames));
    let mut scratch = Vec::new();
    for band in 0..=bands {
        let low = edges[band];
        let high = edges[band + 1];
        let open_top = band == bands;
        let band_bins: Vec<usize> = bin_freqs
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f >= low && (open_top || f <= high))
            .map(|(bin, _)| bin)
            .collect();
        if band_bins.is_empty() {
            continue;
        }
        let take = ((QUANTILE * band_bins.len() as f32).round() as usize).max(1);
        for frame in 0..frames {
            scratch.clear();
            scratch.extend(band_bins.iter().map(|&bin| magnitude[[bin, frame]]));
            scratch.sort_unstable_by(f32::total_cmp);
            let valley = mean(&scratch[..take]);
            let peak = mean(&scratch[scratch.len() - take..]);
            out[[band, frame]] = to_db(peak) - to_db(valley);
        }
    }
    out
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

fn to_db(value: f32) -> f32 {
    10.0 * value.max(POWER_FLOOR).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::descriptors::stft::bin_frequencies;

    #[test]
    fn peaky_band_has_higher_contrast_than_flat_band() {
        let freqs = bin_frequencies(16_000, 512);
        let mut magnitude = Array2::<f32>::from_elem((freqs.len(), 1), 0.01);
        let tone_bin = freqs.iter().position(|&f| f >= 500.0).unwrap();
        magnitude[[tone_bin, 0]] = 1.0;
        let contrast = spectral_contrast(&magnitude, &freqs, 200.0, 4);
        assert_eq!(contrast.nrows(), 5);
        // 500 Hz sits in the 400..800 Hz octave (row 2); the others are flat.
        assert!(contrast[[2, 0]] > 15.0);
        assert!(contrast[[0, 0]].abs() < 1e-4);
        assert!(contrast[[4, 0]].abs() < 1e-4);
    }
}
