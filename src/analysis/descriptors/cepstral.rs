use ndarray::Array2;

use super::mel::power_to_db;

/// Cepstral coefficients: orthonormal DCT-II over the mel axis of the log-mel dB matrix.
pub(crate) fn mfcc(mel_power: &Array2<f32>, count: usize) -> Array2<f32> {
    let log_mel = power_to_db(mel_power, 1.0);
    dct_ii_ortho(log_mel.nrows(), count).dot(&log_mel)
}

/// Row `k` holds the orthonormal DCT-II basis vector of order `k` over `n` inputs.
fn dct_ii_ortho(n: usize, count: usize) -> Array2<f32> {
    let n_f = n.max(1) as f64;
    Array2::from_shape_fn((count, n), |(k, m)| {
        let scale = if k == 0 {
            (1.0 / n_f).sqrt()
        } else {
            (2.0 / n_f).sqrt()
        };
        let angle = std::f64::consts::PI * k as f64 * (2.0 * m as f64 + 1.0) / (2.0 * n_f);
        (scale * angle.cos()) as f32
    })
}

/// Regression delta along the time axis over `width` frames, clamping at the edges.
pub(crate) fn delta(values: &Array2<f32>, width: usize) -> Array2<f32> {
    let half = (width.max(3) / 2) as isize;
    let frames = values.ncols();
    if frames == 0 {
        return values.clone();
    }
    let last = frames as isize - 1;
    let denom: f32 = 2.0 * (1..=half).map(|n| (n * n) as f32).sum::<f32>();
    Array2::from_shape_fn(values.dim(), |(row, t)| {
        let t = t as isize;
        let mut acc = 0.0_f32;
        for n in 1..=half {
            let ahead = values[[row, (t + n).min(last) as usize]];
            let behind = values[[row, (t - n).max(0) as usize]];
            acc += n as f32 * (ahead - behind);
        }
        acc / denom
    })
}
