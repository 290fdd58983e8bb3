use std::f32::consts::PI;

use ndarray::Array2;
use rayon::prelude::*;
use rustfft::{FftPlanner, num_complex::Complex};

/// Magnitude spectrogram, `fft_size / 2 + 1` bins by frames.
pub(crate) struct Spectrogram {
    pub(crate) magnitude: Array2<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) fft_size: usize,
}

impl Spectrogram {
    pub(crate) fn bins(&self) -> usize {
        self.magnitude.nrows()
    }

    pub(crate) fn frames(&self) -> usize {
        self.magnitude.ncols()
    }

    /// Center frequency of every bin in Hz.
    pub(crate) fn bin_frequencies(&self) -> Vec<f32> {
        bin_frequencies(self.sample_rate, self.fft_size)
    }

    pub(crate) fn power(&self) -> Array2<f32> {
        self.magnitude.mapv(|m| m * m)
    }
}

/// Frames produced by centered framing of `len` samples.
pub(crate) fn frame_count(len: usize, hop: usize) -> usize {
    1 + len / hop.max(1)
}

pub(crate) fn bin_frequencies(sample_rate: u32, fft_size: usize) -> Vec<f32> {
    let bins = fft_size / 2 + 1;
    (0..bins)
        .map(|bin| bin as f32 * sample_rate as f32 / fft_size as f32)
        .collect()
}

/// Periodic Hann window.
pub(crate) fn hann_window(length: usize) -> Vec<f32> {
    (0..length)
        .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f32 / length as f32).cos()))
        .collect()
}

/// Centered short-time Fourier transform magnitude.
///
/// The signal is zero-padded by `fft_size / 2` on both sides, so frame `t` is centered on
/// sample `t * hop`.
pub(crate) fn stft_magnitude(
    samples: &[f32],
    sample_rate: u32,
    fft_size: usize,
    hop: usize,
) -> Spectrogram {
    let pad = fft_size / 2;
    let mut padded = vec![0.0_f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);

    let frames = frame_count(samples.len(), hop);
    let bins = fft_size / 2 + 1;
    let window = hann_window(fft_size);
    let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);

    let columns: Vec<Vec<f32>> = (0..frames)
        .into_par_iter()
        .map(|frame| {
            let start = frame * hop;
            let mut buffer: Vec<Complex<f32>> = padded[start..start + fft_size]
                .iter()
                .zip(&window)
                .map(|(&s, &w)| Complex { re: s * w, im: 0.0 })
                .collect();
            fft.process(&mut buffer);
            buffer[..bins].iter().map(|c| c.norm()).collect()
        })
        .collect();

    let mut magnitude = Array2::<f32>::zeros((bins, frames));
    for (frame, column) in columns.iter().enumerate() {
        for (bin, &value) in column.iter().enumerate() {
            magnitude[[bin, frame]] = value;
        }
    }
    Spectrogram {
        magnitude,
        sample_rate,
        fft_size,
    }
}
