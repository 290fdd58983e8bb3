use ndarray::Array2;

/// Values this close to zero count as non-negative.
const ZERO_THRESHOLD: f32 = 1e-10;

/// Zero-crossing rate over centered, edge-padded frames of `frame_length` samples.
pub(crate) fn zero_crossing_rate(
    samples: &[f32],
    frame_length: usize,
    hop: usize,
    frames: usize,
) -> Array2<f32> {
    let mut out = Array2::<f32>::zeros((1, frames));
    if samples.is_empty() {
        return out;
    }
    let last = samples.len() as isize - 1;
    let half = (frame_length / 2) as isize;
    let negative = |idx: isize| samples[idx.clamp(0, last) as usize] < -ZERO_THRESHOLD;
    for frame in 0..frames {
        let start = (frame * hop) as isize - half;
        let mut crossings = 0usize;
        let mut prev = negative(start);
        for offset in 1..frame_length as isize {
            let current = negative(start + offset);
            if current != prev {
                crossings += 1;
            }
            prev = current;
        }
        out[[0, frame]] = crossings as f32 / frame_length as f32;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_signal_crosses_every_sample() {
        let samples: Vec<f32> = (0..256)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let zcr = zero_crossing_rate(&samples, 64, 32, 5);
        assert!((zcr[[0, 2]] - 63.0 / 64.0).abs() < 1e-6);
    }

    #[test]
    fn constant_signal_never_crosses() {
        let zcr = zero_crossing_rate(&[0.3; 100], 32, 16, 7);
        assert!(zcr.iter().all(|&v| v == 0.0));
    }
}
