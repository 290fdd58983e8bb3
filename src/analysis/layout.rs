use super::config::FingerprintConfig;

/// Prefix of every layout tag; bump when the vector layout itself changes.
pub const LAYOUT_PREFIX: &str = "fp_v1_";

/// Tag identifying the feature layout produced by `config`.
///
/// Two fingerprints are comparable only when their tags match. Every parameter that
/// changes the extracted values is hashed; the decode timeout is not.
pub fn layout_tag(config: &FingerprintConfig) -> String {
    let denoise = &config.denoise;
    let payload = format!(
        "sr={}|max={}|fft={}|hop={}|mels={}|mfcc={}|contrast={}@{}|rolloff={}|tempo={}|delta={}|denoise={}:{}:{}:{}",
        config.sample_rate,
        config.max_duration_seconds,
        config.fft_size,
        config.hop_length,
        config.mel_bands,
        config.mfcc_count,
        config.contrast_bands,
        config.contrast_fmin_hz,
        config.rolloff_percent,
        config.tempo_window,
        config.delta_width,
        denoise.enabled,
        denoise.search_radius,
        denoise.patch_radius,
        denoise.strength,
    );
    let hash = blake3::hash(payload.as_bytes());
    format!("{LAYOUT_PREFIX}{}", hash.to_hex())
}
