use ndarray::{Array1, Array2, Axis};
use rustfft::{FftPlanner, num_complex::Complex};

use super::stft::hann_window;

/// Mean positive frame-to-frame rise of the log-mel spectrogram; frame 0 is 0.
pub(crate) fn onset_envelope(log_mel: &Array2<f32>) -> Array1<f32> {
    let frames = log_mel.ncols();
    let bands = log_mel.nrows().max(1) as f32;
    let mut envelope = Array1::<f32>::zeros(frames);
    for t in 1..frames {
        let rise: f32 = log_mel
            .column(t)
            .iter()
            .zip(log_mel.column(t - 1).iter())
            .map(|(&now, &before)| (now - before).max(0.0))
            .sum();
        envelope[t] = rise / bands;
    }
    envelope
}

/// Local autocorrelation of the onset envelope.
///
/// Column `t` is the autocorrelation of a Hann-windowed span of `window` frames centered on
/// frame `t`, one row per lag, scaled by its largest absolute value.
pub(crate) fn tempogram(envelope: &Array1<f32>, window: usize) -> Array2<f32> {
    let frames = envelope.len();
    let mut out = Array2::<f32>::zeros((window, frames));
    if frames == 0 || window == 0 {
        return out;
    }
    let n_fft = (2 * window).next_power_of_two();
    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(n_fft);
    let inverse = planner.plan_fft_inverse(n_fft);
    let hann = hann_window(window);
    let half = (window / 2) as isize;
    let mut buffer = vec![Complex { re: 0.0_f32, im: 0.0 }; n_fft];

    for (t, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
        buffer.fill(Complex { re: 0.0, im: 0.0 });
        for (k, &w) in hann.iter().enumerate() {
            let idx = t as isize - half + k as isize;
            if (0..frames as isize).contains(&idx) {
                buffer[k].re = envelope[idx as usize] * w;
            }
        }
        forward.process(&mut buffer);
        for c in buffer.iter_mut() {
            *c = Complex {
                re: c.norm_sqr(),
                im: 0.0,
            };
        }
        inverse.process(&mut buffer);
        let peak = buffer[..window]
            .iter()
            .fold(0.0_f32, |m, c| m.max(c.re.abs()));
        if peak > 0.0 {
            for (lag, cell) in column.iter_mut().enumerate() {
                *cell = buffer[lag].re / peak;
            }
        }
    }
    out
}
