//! Non-local means smoothing on the raw waveform.
//!
//! Each sample becomes a weighted average of its neighbors, where a neighbor's weight
//! falls off with the distance between the patches around the two samples. Periodic
//! structure finds close matches a cycle away and survives; an isolated impulse has no
//! similar patch nearby and is pulled toward its surroundings.

use rayon::prelude::*;

use crate::analysis::config::DenoiseConfig;

/// Buffers shorter than this are filtered on the calling thread.
const PARALLEL_MIN_SAMPLES: usize = 16_384;

/// Scale from median absolute deviation to a Gaussian standard deviation.
const MAD_TO_SIGMA: f64 = 0.674_489_75;

/// Apply the neighborhood filter, returning a new buffer of the same length.
pub(crate) fn denoise(samples: &[f32], config: &DenoiseConfig) -> Vec<f32> {
    if !config.enabled || samples.len() < 3 {
        return samples.to_vec();
    }
    let sigma = estimate_noise_sigma(samples);
    if !(sigma > 0.0) {
        return samples.to_vec();
    }
    let search = config.search_radius.max(1);
    let patch = config.patch_radius.max(1);
    let patch_len = (2 * patch + 1) as f64;
    let h = config.strength.max(f32::EPSILON) as f64 * sigma * patch_len.sqrt();
    let filter = Filter {
        samples,
        search,
        patch,
        inv_h2: 1.0 / (h * h),
    };
    if samples.len() >= PARALLEL_MIN_SAMPLES {
        (0..samples.len())
            .into_par_iter()
            .map(|i| filter.sample_at(i))
            .collect()
    } else {
        (0..samples.len()).map(|i| filter.sample_at(i)).collect()
    }
}

/// Noise level estimated from first differences: `median(|x[n+1] - x[n]|) / (0.6745 * sqrt 2)`.
pub(crate) fn estimate_noise_sigma(samples: &[f32]) -> f64 {
    let mut diffs: Vec<f64> = samples
        .windows(2)
        .map(|pair| (pair[1] as f64 - pair[0] as f64).abs())
        .filter(|d| d.is_finite())
        .collect();
    if diffs.is_empty() {
        return 0.0;
    }
    let mid = diffs.len() / 2;
    let (_, median, _) = diffs.select_nth_unstable_by(mid, f64::total_cmp);
    *median / (MAD_TO_SIGMA * std::f64::consts::SQRT_2)
}

struct Filter<'a> {
    samples: &'a [f32],
    search: usize,
    patch: usize,
    inv_h2: f64,
}

impl Filter<'_> {
    fn sample_at(&self, i: usize) -> f32 {
        let n = self.samples.len();
        let lo = i.saturating_sub(self.search);
        let hi = (i + self.search).min(n - 1);

        let mut distances = [0.0_f64; 64];
        let mut spill = Vec::new();
        let neighbors = hi - lo;
        let dist: &mut [f64] = if neighbors <= distances.len() {
            &mut distances[..neighbors]
        } else {
            spill.resize(neighbors, 0.0);
            spill.as_mut_slice()
        };

        let mut slot = 0;
        let mut best = f64::INFINITY;
        for j in lo..=hi {
            if j == i {
                continue;
            }
            let d = self.patch_distance(i, j);
            best = best.min(d);
            dist[slot] = d;
            slot += 1;
        }
        if !best.is_finite() {
            return self.samples[i];
        }

        // The center sample weighs as much as the closest neighbor.
        let mut weight_sum = 1.0_f64;
        let mut acc = self.samples[i] as f64;
        slot = 0;
        for j in lo..=hi {
            if j == i {
                continue;
            }
            let w = (-(dist[slot] - best) * self.inv_h2).exp();
            acc += w * self.samples[j] as f64;
            weight_sum += w;
            slot += 1;
        }
        (acc / weight_sum) as f32
    }

    fn patch_distance(&self, a: usize, b: usize) -> f64 {
        let last = self.samples.len() as isize - 1;
        let patch = self.patch as isize;
        let mut sum = 0.0_f64;
        for k in -patch..=patch {
            let ia = (a as isize + k).clamp(0, last) as usize;
            let ib = (b as isize + k).clamp(0, last) as usize;
            let diff = self.samples[ia] as f64 - self.samples[ib] as f64;
            sum += diff * diff;
        }
        sum
    }
}
