use std::path::PathBuf;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_sample_rate() -> u32 {
    44_100
}

pub(crate) fn default_max_duration_seconds() -> f32 {
    45.0
}

pub(crate) fn default_fft_size() -> usize {
    4096
}

pub(crate) fn default_hop_length() -> usize {
    256
}

pub(crate) fn default_mel_bands() -> usize {
    256
}

pub(crate) fn default_mfcc_count() -> usize {
    13
}

pub(crate) fn default_contrast_bands() -> usize {
    6
}

pub(crate) fn default_contrast_fmin_hz() -> f32 {
    200.0
}

pub(crate) fn default_rolloff_percent() -> f32 {
    0.85
}

pub(crate) fn default_tempo_window() -> usize {
    384
}

pub(crate) fn default_delta_width() -> usize {
    9
}

pub(crate) fn default_decode_timeout_seconds() -> f32 {
    30.0
}

pub(crate) fn default_denoise_search_radius() -> usize {
    6
}

pub(crate) fn default_denoise_patch_radius() -> usize {
    3
}

pub(crate) fn default_denoise_strength() -> f32 {
    1.0
}

pub(crate) fn default_threshold() -> f32 {
    0.65
}

pub(crate) fn default_cosine_weight() -> f32 {
    0.7
}

pub(crate) fn default_euclidean_weight() -> f32 {
    0.3
}

pub(crate) fn default_max_results() -> usize {
    5
}

pub(crate) fn default_parallel_min_entries() -> usize {
    64
}

pub(crate) fn default_music_dir() -> PathBuf {
    PathBuf::from("./music_folder")
}
