//! Conditioning applied to every buffer before descriptor extraction.

mod denoise;
mod normalize;

use super::config::DenoiseConfig;

use denoise::denoise;
use normalize::TARGET_RMS_DB;

/// Level-normalize, then denoise. Returns a new buffer; the input is not modified.
pub(crate) fn condition(samples: &[f32], denoise_config: &DenoiseConfig) -> Vec<f32> {
    let mut leveled = samples.to_vec();
    normalize::normalize_level_in_place(&mut leveled, TARGET_RMS_DB);
    denoise(&leveled, denoise_config)
}
