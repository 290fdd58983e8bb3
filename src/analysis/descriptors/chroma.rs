use ndarray::{Array2, Axis};

use crate::analysis::config::CHROMA_BINS;

/// Bins below A0 carry no usable pitch information.
const MIN_PITCH_HZ: f32 = 27.5;

/// Pitch-class energy per frame, each frame scaled so its strongest class is 1.
pub(crate) fn chroma(power: &Array2<f32>, bin_freqs: &[f32]) -> Array2<f32> {
    let mut out = pitch_class_map(bin_freqs).dot(power);
    for mut column in out.axis_iter_mut(Axis(1)) {
        let peak = column.iter().copied().fold(0.0_f32, f32::max);
        if peak > 0.0 {
            column.mapv_inplace(|v| v / peak);
        }
    }
    out
}

/// Soft assignment of every FFT bin to its two nearest pitch classes (C = 0).
fn pitch_class_map(bin_freqs: &[f32]) -> Array2<f32> {
    let mut map = Array2::<f32>::zeros((CHROMA_BINS, bin_freqs.len()));
    for (bin, &freq) in bin_freqs.iter().enumerate() {
        if freq < MIN_PITCH_HZ {
            continue;
        }
        let midi = 69.0 + 12.0 * (freq / 440.0).log2();
        let class = midi.rem_euclid(CHROMA_BINS as f32);
        let lower = class.floor();
        let frac = class - lower;
        let lo = lower as usize % CHROMA_BINS;
        let hi = (lo + 1) % CHROMA_BINS;
        map[[lo, bin]] += 1.0 - frac;
        map[[hi, bin]] += frac;
    }
    map
}
