use ndarray::{Array2, Axis};

/// Frequency below which `fraction` of each frame's magnitude lies.
pub(crate) fn rolloff(magnitude: &Array2<f32>, bin_freqs: &[f32], fraction: f32) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros((1, magnitude.ncols()));
    for (frame, column) in magnitude.axis_iter(Axis(1)).enumerate() {
        let total: f64 = column.iter().map(|&m| m.max(0.0) as f64).sum();
        if total <= 0.0 {
            continue;
        }
        let target = total * fraction as f64;
        let mut cumulative = 0.0_f64;
        let mut freq = bin_freqs.last().copied().unwrap_or(0.0);
        for (bin, &m) in column.iter().enumerate() {
            cumulative += m.max(0.0) as f64;
            if cumulative >= target {
                freq = bin_freqs[bin];
                break;
            }
        }
        out[[0, frame]] = freq;
    }
    out
}

/// Second-order spread of each frame's magnitude around its centroid, in Hz.
pub(crate) fn bandwidth(magnitude: &Array2<f32>, bin_freqs: &[f32]) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros((1, magnitude.ncols()));
    for (frame, column) in magnitude.axis_iter(Axis(1)).enumerate() {
        let total: f64 = column.iter().map(|&m| m.max(0.0) as f64).sum();
        if total <= 0.0 {
            continue;
        }
        let centroid: f64 = column
            .iter()
            .zip(bin_freqs)
            .map(|(&m, &f)| m.max(0.0) as f64 * f as f64)
            .sum::<f64>()
            / total;
        let spread: f64 = column
            .iter()
            .zip(bin_freqs)
            .map(|(&m, &f)| {
                let diff = f as f64 - centroid;
                m.max(0.0) as f64 * diff * diff
            })
            .sum::<f64>()
            / total;
        out[[0, frame]] = spread.sqrt() as f32;
    }
    out
}
